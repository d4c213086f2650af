//! jsonshape CLI.
//!
//! Small playground around the codec: encode/decode a built-in sample
//! document and run the tokenizer over object or array bodies.

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use jsonshape::{deserialize, record_shape, scan_array_body, scan_object_body, serialize};

#[derive(Debug, Default, PartialEq)]
struct Student {
    name: String,
    age: i64,
}

record_shape! { Student { name: String, age: i64 } }

#[derive(Debug, Default, PartialEq)]
struct Class {
    name: String,
    students: Vec<Box<Student>>,
}

record_shape! { Class { name: String, students: Vec<Box<Student>> } }

#[derive(Parser)]
#[command(name = "jsonshape")]
#[command(about = "Shape-driven JSON codec", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode the built-in sample document and decode it back
    Demo,
    /// Scan an object body (text between `{` and `}`) and print its fields
    ScanObject {
        /// The body text to scan
        body: String,
    },
    /// Scan an array body (text between `[` and `]`) and print its elements
    ScanArray {
        /// The body text to scan
        body: String,
    },
}

fn run_demo() -> ExitCode {
    let class = Class {
        name: "Math".to_string(),
        students: vec![
            Box::new(Student {
                name: "John".to_string(),
                age: 30,
            }),
            Box::new(Student {
                name: "Jane".to_string(),
                age: 25,
            }),
        ],
    };

    let encoded = serialize(&class);
    println!("{encoded}");

    let mut decoded = Class::default();
    match deserialize(&encoded, &mut decoded) {
        Ok(()) if decoded == class => {
            println!("round-trip ok: {} students", decoded.students.len());
            ExitCode::SUCCESS
        }
        Ok(()) => {
            eprintln!("round-trip mismatch");
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("round-trip failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_scan_object(body: &str) -> ExitCode {
    match scan_object_body(body) {
        Ok(fields) => {
            for (name, value) in &fields {
                println!("{name} = {value}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run_scan_array(body: &str) -> ExitCode {
    match scan_array_body(body) {
        Ok(elements) => {
            for element in &elements {
                println!("{element}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Demo => run_demo(),
        Commands::ScanObject { body } => run_scan_object(&body),
        Commands::ScanArray { body } => run_scan_array(&body),
    }
}
