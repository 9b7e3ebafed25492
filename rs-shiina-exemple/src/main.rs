use rs_shiina_core::corpus::CorpusFile;
use rs_shiina_core::model::generation_input::{GenerationInput, GenerationMode};
use rs_shiina_core::model::generator::Generator;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Open the learned corpus (one tokenized sentence per line)
    // A binary cache "dialogue.bin" is written next to it on first load
    let corpus = CorpusFile::open("./data/dialogue.jsonl")?;
    let mut app = Generator::from_corpus(&corpus)?;
    println!("{} sentences learned", app.dictionary().len());

    // Default input: empty seed, random learned skeleton, structured mode
    let mut input = GenerationInput::new();

    // Hard cap on the number of generated tokens
    input.set_max_tokens(50)?;

    // A cap of 0 is rejected
    match input.set_max_tokens(0) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("{e}"),
    }

    // Structured mode keeps particles and symbols of the skeleton
    // and swaps nouns and verbs for learned ones
    for i in 0..10 {
        println!("Structured {}: {}", i + 1, app.generate_with(&input)?.text);
    }

    // Tagged mode only keeps the part-of-speech of each skeleton slot
    input.mode = GenerationMode::Tagged;
    for i in 0..10 {
        println!("Tagged {}: {}", i + 1, app.generate_with(&input)?.text);
    }

    // Free mode chains words until nothing follows or the cap is reached
    input.mode = GenerationMode::Free;
    for i in 0..10 {
        println!("Free {}: {}", i + 1, app.generate_with(&input)?.text);
    }

    // Ask what may follow the start of a sentence
    match app.next("", None)? {
        Some(word) => println!("A sentence may start with '{}' ({})", word.surface_form, word.pos),
        None => println!("Nothing learned yet"),
    }

    Ok(())
}
