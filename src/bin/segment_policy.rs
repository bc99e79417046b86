use clap::Parser;
use policy_scan_lib::services::{load_document, segment_paragraphs, Normalizer};
use serde::Serialize;
use std::path::PathBuf;

/// Dump the paragraphs and token sequences of a policy document.
#[derive(Parser, Debug)]
#[command(name = "segment_policy")]
struct Args {
    /// Input document (.txt, .md, .docx or .pdf)
    path: PathBuf,

    /// Number of paragraphs to print
    #[arg(long, default_value_t = 50)]
    paragraphs: usize,

    /// Write the full dump as JSON
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ParagraphDump {
    index: usize,
    chars: usize,
    text: String,
    tokens: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Output {
    file: String,
    extracted_chars: usize,
    extracted_bytes: usize,
    paragraphs: Vec<ParagraphDump>,
}

fn preview(s: &str, max_chars: usize) -> String {
    let mut out: String = s.chars().take(max_chars).collect();
    if s.chars().count() > max_chars {
        out.push_str("...");
    }
    out.replace('\n', " / ")
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let text = load_document(&args.path)?;
    let normalizer = Normalizer::new();

    let paragraphs: Vec<ParagraphDump> = segment_paragraphs(&text)
        .into_iter()
        .enumerate()
        .map(|(index, p)| ParagraphDump {
            index,
            chars: p.chars().count(),
            tokens: normalizer.normalize(&p),
            text: p,
        })
        .collect();

    println!("File: {}", args.path.display());
    println!("Extracted: {} chars ({} bytes)", text.chars().count(), text.len());
    println!("Paragraphs: {}", paragraphs.len());
    println!();

    for p in paragraphs.iter().take(args.paragraphs) {
        println!(
            "[P{:04}] chars={} tokens={}  {}",
            p.index,
            p.chars,
            p.tokens.len(),
            preview(&p.text, 140)
        );
    }
    if paragraphs.len() > args.paragraphs {
        println!("... ({} more paragraphs)", paragraphs.len() - args.paragraphs);
    }

    if let Some(out_path) = args.out {
        let out = Output {
            file: args.path.display().to_string(),
            extracted_chars: text.chars().count(),
            extracted_bytes: text.len(),
            paragraphs,
        };
        let json = serde_json::to_string_pretty(&out)?;
        std::fs::write(&out_path, json)?;
        println!();
        println!("Wrote JSON: {}", out_path.display());
    }

    Ok(())
}
