use std::{fs, process::exit};

use clap::Parser;

use crate::feed::Scraper;

mod error;
mod feed;

#[derive(Parser)]
#[clap(version, about)]
struct Args {
    /// Channel URL, e.g. https://www.youtube.com/@somechannel
    #[clap(value_parser)]
    url: String,

    /// File the scraped posts are written to, as pretty-printed JSON.
    #[clap(short, long, value_parser, default_value = "posts.json")]
    output: String,

    /// Stop after this many posts.
    #[clap(short, long, value_parser)]
    limit: Option<usize>,
}

fn main() {
    let args = Args::parse();

    println!("Scraping posts from {}...", args.url);
    if let Some(limit) = args.limit {
        println!("Limit: {}", limit);
    }

    let scraper = Scraper::new();
    let posts = match scraper.fetch_posts(&args.url, args.limit) {
        Ok(posts) => posts,
        Err(e) => {
            eprintln!("Error: {}", e);
            exit(1);
        }
    };

    println!("Found {} posts.", posts.len());

    let json = match serde_json::to_string_pretty(&posts) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Failed to serialize posts: {}", e);
            exit(1);
        }
    };

    if let Err(e) = fs::write(&args.output, json) {
        eprintln!("Failed to write {}: {}", args.output, e);
        exit(1);
    }

    println!("Saved to {}", args.output);
}
