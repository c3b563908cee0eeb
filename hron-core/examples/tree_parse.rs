//! Parse HRON from stdin (or a built-in sample) into a tree and print it.
//!
//! Run with: cargo run --example tree_parse < file.hron

use std::io::Read;

use hron_core::{parse_tree, write_object, Entity, Object, ParseOptions};

const SAMPLE: &str = "@server\n\t=host\n\t\texample.com\n\t=port\n\t\t8080\n";

fn main() {
    let mut input = String::new();
    if std::io::stdin().read_to_string(&mut input).is_err() || input.is_empty() {
        input = SAMPLE.to_owned();
    }

    match parse_tree(&input, &ParseOptions::default()) {
        Ok(root) => {
            dump(&root, 0);
            println!("--- canonical ---");
            println!("{}", write_object(&root));
        }
        Err(errors) => {
            for error in errors {
                eprintln!("error: {}", error);
            }
            std::process::exit(1);
        }
    }
}

fn dump(object: &Object, depth: usize) {
    for member in object.members() {
        let pad = "  ".repeat(depth);
        match &member.entity {
            Entity::Value(value) => println!("{}{} = {:?}", pad, member.name, value),
            Entity::Object(nested) => {
                println!("{}{}:", pad, member.name);
                dump(nested, depth + 1);
            }
        }
    }
}
