use structopt::StructOpt;
use tatoeba_anki::cli::TatoebaAnki;
use tatoeba_anki::error::Error;
use tatoeba_anki::pipeline::{Deck, Pipeline};

#[macro_use]
extern crate log;

fn main() -> Result<(), Error> {
    env_logger::init();

    let opt = TatoebaAnki::from_args();
    debug!("cli args\n{:#?}", opt);

    let deck = Deck::new(opt.into());
    let summary = deck.run()?;

    println!("Deck: {} cards in {}", summary.cards, summary.deck.display());
    println!("Audio files: {}", summary.audio.display());
    if summary.dropped_cards > 0 {
        println!(
            "{} cards were dropped because audio for {} sentences could not be fetched (see logs).",
            summary.dropped_cards, summary.missing_audio
        );
    }
    println!();
    println!("Next steps:");
    println!("1. Import the csv file into Anki (File → Import, fields separated by tabs)");
    println!("2. Copy the mp3 files to your Anki media collection folder");

    Ok(())
}
