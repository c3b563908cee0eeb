//! Bind HRON text straight into a struct through a registered schema.
//!
//! Run with: cargo run --example typed_parse

use hron_core::{parse_typed, ParseOptions, Schema};

#[derive(Default, Debug)]
struct Server {
    host: String,
    port: u16,
    tags: Vec<String>,
}

fn main() {
    let mut schema = Schema::new();
    let text = schema.text();
    let port = schema.scalar::<u16>();
    let tags = schema.list_of::<String>(text);
    schema
        .record::<Server>("Server")
        .field("host", text, |s: &mut Server, v: String| s.host = v)
        .field("port", port, |s: &mut Server, v: u16| s.port = v)
        .field("tags", tags, |s: &mut Server, v: String| s.tags.push(v))
        .finish();

    let input = "=host\n\texample.com\n=port\n\t8080\n=tags\n\tedge\n=tags\n\tprod\n";
    match parse_typed::<Server>(&schema, input, &ParseOptions::default()) {
        Ok(server) => println!("{:#?}", server),
        Err(errors) => {
            for error in errors {
                eprintln!("error: {}", error);
            }
            std::process::exit(1);
        }
    }
}
