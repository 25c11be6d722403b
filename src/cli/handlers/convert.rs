use std::path::Path;

use crate::cli::commands::ConvertArgs;
use crate::cli::output::parse_tree_format;
use crate::io::tree_io;

use super::Context;

pub fn cmd_convert(ctx: &Context, args: ConvertArgs) -> Result<(), Box<dyn std::error::Error>> {
    let input = Path::new(&args.input);
    let output = Path::new(&args.output);
    let format = match args.to.as_deref() {
        Some(name) => parse_tree_format(name)?,
        None => ctx.settings.storage.format,
    };

    let tree = tree_io::load_tree(input)?;
    tree_io::save_tree(output, &tree, format)?;

    if ctx.json {
        let summary = serde_json::json!({
            "input": args.input,
            "output": args.output,
            "format": format,
            "items": tree.len().saturating_sub(1),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "Converted {} → {} ({}, {} items)",
            args.input,
            args.output,
            format,
            tree.len().saturating_sub(1)
        );
    }
    Ok(())
}
