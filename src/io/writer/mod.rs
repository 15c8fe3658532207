/*!
# Deck writing

[DeckWriter] emits one tab-separated row per [crate::corpus::Card]:

| target text | base text | `[sound:<id>.mp3]` | tags |

Quoting follows the usual CSV convention (fields containing a tab, a quote or a newline are quoted,
quotes are doubled), so that any CSV parser configured for tabs reads back the exact strings.
The tags column is rendered according to a [TagFormat].
!*/
mod deck;
mod tags;

pub use deck::DeckWriter;
pub use tags::TagFormat;
