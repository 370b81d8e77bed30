//! Render `docs/*.md` into rustdoc guides.
//!
//! Every markdown file becomes a module under `stripper::guides`, named after
//! the file (`row-compaction.md` -> `guides::row_compaction`). Relative links
//! between guides are rewritten into intra-doc paths.

use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

fn main() {
    let out_dir = PathBuf::from(env::var_os("OUT_DIR").expect("cargo sets OUT_DIR"));
    let docs_out = out_dir.join("docs");
    fs::create_dir_all(&docs_out).expect("create docs output dir");

    let mut guides: Vec<PathBuf> = fs::read_dir("docs")
        .expect("read docs/")
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "md"))
        .collect();
    guides.sort();

    let mut index = String::new();
    for path in &guides {
        let file_name = path.file_name().expect("guide has a file name");
        let markdown = fs::read_to_string(path).expect("read guide");
        fs::write(docs_out.join(file_name), link_guides(&markdown)).expect("write guide");

        writeln!(
            index,
            "#[doc = include_str!(concat!(env!(\"OUT_DIR\"), \"/docs/{}\"))]\npub mod {} {{}}\n",
            file_name.to_string_lossy(),
            module_name(path),
        )
        .expect("format guide index");
    }
    fs::write(out_dir.join("guides.rs"), index).expect("write guide index");

    println!("cargo:rerun-if-changed=docs/");
}

/// `docs/browser-usage.md` -> `browser_usage`.
fn module_name(path: &Path) -> String {
    path.file_stem()
        .expect("guide has a stem")
        .to_string_lossy()
        .replace('-', "_")
}

/// Rewrite `](./other-guide.md)` link targets to `](crate::guides::other_guide)`.
/// Any other link is left untouched.
fn link_guides(markdown: &str) -> String {
    let mut pieces = markdown.split("](./");
    let mut out = pieces.next().unwrap_or_default().to_owned();

    for piece in pieces {
        match piece.split_once(".md)") {
            Some((target, rest)) if !target.contains([')', ' ', '\n']) => {
                out.push_str("](crate::guides::");
                out.push_str(&target.replace('-', "_"));
                out.push(')');
                out.push_str(rest);
            }
            _ => {
                out.push_str("](./");
                out.push_str(piece);
            }
        }
    }
    out
}
