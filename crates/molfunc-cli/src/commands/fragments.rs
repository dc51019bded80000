use crate::cli::FragmentsArgs;
use crate::commands::load_library;
use crate::error::Result;
use molfunc::core::fragments::library::FragmentLibrary;
use std::fmt::Write;

pub fn run(args: FragmentsArgs) -> Result<()> {
    let library = load_library(&args.libraries)?;
    print!("{}", render_table(&library));
    Ok(())
}

fn render_table(library: &FragmentLibrary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<8} {:>5}  {:<10}  aliases", "name", "atoms", "motif");
    for fragment in library.iter() {
        let motif = fragment
            .motif()
            .map(|m| m.to_string())
            .unwrap_or_else(|| "-".to_string());
        let aliases = fragment
            .tags()
            .iter()
            .filter(|tag| tag.as_str() != fragment.name())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(
            out,
            "{:<8} {:>5}  {:<10}  {}",
            fragment.name(),
            fragment.n_real_atoms(),
            motif,
            aliases
        );
    }
    out
}
