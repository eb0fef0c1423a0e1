//! Read HTML from stdin, print the token stream.
//!
//!     echo '<p class="x">hi</p>' | cargo run --example tokenize

use std::io::{stdin, BufReader};

use html5pull::Tokenizer;

fn main() {
    let tokenizer = Tokenizer::new(BufReader::new(stdin().lock()));

    for token in tokenizer {
        match token {
            Ok(token) => println!("{:?}", token),
            Err(e) => {
                eprintln!("read error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
