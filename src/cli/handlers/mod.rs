mod convert;
pub use convert::cmd_convert;

use std::path::{Path, PathBuf};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::{config_io, tree_io};
use crate::model::config::{Settings, TreeFormat};
use crate::model::item::{ItemId, ItemKind, join_link_path, split_link_path};
use crate::model::tree::Tree;
use crate::ops::check;
use crate::ops::item_ops;
use crate::ops::session::AppSession;
use crate::parse::serialize_item;

/// Where the command runs: resolved settings and tree database path
pub struct Context {
    pub settings: Settings,
    pub tree_path: PathBuf,
    pub json: bool,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let settings = config_io::read_settings(Path::new(&cli.config))?;
    let tree_path = PathBuf::from(cli.file.as_deref().unwrap_or(&settings.storage.file));
    let ctx = Context {
        settings,
        tree_path,
        json: cli.json,
    };

    match cli.command {
        // Read commands
        Commands::Show(args) => cmd_show(&ctx, args),
        Commands::Find(args) => cmd_find(&ctx, args),
        Commands::Check => cmd_check(&ctx),

        // Write commands
        Commands::Add(args) => cmd_add(&ctx, args),
        Commands::Convert(args) => cmd_convert(&ctx, args),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Turn command-line path arguments into name segments. Accepts separate
/// segments (`Work Ideas`) or one slash-separated path (`/Work/Ideas`).
pub fn path_segments(args: &[String]) -> Vec<String> {
    match args {
        [single] if single.starts_with('/') => single
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => args.to_vec(),
    }
}

fn resolve(tree: &Tree, args: &[String]) -> Result<ItemId, Box<dyn std::error::Error>> {
    let segments = path_segments(args);
    tree.find_by_path(&segments).ok_or_else(|| {
        format!(
            "item not found: {}",
            crate::model::item::display_link_path(&join_link_path(&segments))
        )
        .into()
    })
}

// ---------------------------------------------------------------------------
// Read command handlers
// ---------------------------------------------------------------------------

fn cmd_show(ctx: &Context, args: ShowArgs) -> Result<(), Box<dyn std::error::Error>> {
    let tree = tree_io::load_tree(&ctx.tree_path)?;
    let id = resolve(&tree, &args.path)?;

    if ctx.json {
        println!("{}", serialize_item(&tree, id)?);
        return Ok(());
    }
    println!("{}", tree.title(id));
    for line in format_outline(&tree, id, args.depth, args.width) {
        println!("{}", line);
    }
    Ok(())
}

fn cmd_find(ctx: &Context, args: FindArgs) -> Result<(), Box<dyn std::error::Error>> {
    let tree = tree_io::load_tree(&ctx.tree_path)?;
    let id = resolve(&tree, &args.path)?;

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&found_to_json(&tree, id))?);
    } else {
        println!("{}", canonical_path(&tree, id));
    }
    Ok(())
}

fn cmd_check(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let tree = tree_io::load_tree(&ctx.tree_path)?;
    let result = check::check_tree(&tree);

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        for line in format_check_result(&result) {
            println!("{}", line);
        }
    }
    if !result.valid {
        return Err(format!("{} broken link(s)", result.errors.len()).into());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write command handlers
// ---------------------------------------------------------------------------

fn cmd_add(ctx: &Context, args: AddArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (tree, load_error) = tree_io::load_tree_or_empty(&ctx.tree_path);
    if let Some(e) = load_error {
        return Err(e.into());
    }
    let format = stored_format(&ctx.tree_path).unwrap_or(ctx.settings.storage.format);
    if format == TreeFormat::Text && args.item_type() != "text" {
        return Err(format!(
            "{} uses the text format, which cannot store {} items; convert it to json first",
            ctx.tree_path.display(),
            args.item_type()
        )
        .into());
    }

    let parent = resolve(&tree, &args.path)?;
    let mut session = AppSession::new(tree, ctx.settings.clone());
    session.go_to(parent)?;

    let id = if let Some(ref target) = args.link {
        let segments = split_link_path(&target.replace('/', "\t"))
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>();
        let target_id = resolve(session.tree(), &segments)?;
        item_ops::create_link(&mut session, target_id, args.name.clone())?
    } else {
        let kind = if args.separator {
            ItemKind::Separator
        } else {
            let name = args.name.clone().ok_or("--name is required")?;
            if args.checkbox {
                ItemKind::checkbox(name, false)
            } else if args.remote {
                ItemKind::remote(name)
            } else {
                ItemKind::text(name)
            }
        };
        item_ops::add_item(&mut session, kind, None)?
    };

    tree_io::save_tree(&ctx.tree_path, session.tree(), format)?;

    let tree = session.tree();
    let position = tree.position_in_parent(id).unwrap_or_default();
    if ctx.json {
        let added = AddedJson {
            parent: canonical_path(tree, parent),
            item_type: tree.kind(id).map_or("unknown", |k| k.type_name()),
            name: tree.display_name(id),
            position,
        };
        println!("{}", serde_json::to_string_pretty(&added)?);
    } else {
        println!("{}", format_item_line(tree, id));
    }
    Ok(())
}

/// Format of an existing database, so edits keep the file in its format
fn stored_format(path: &Path) -> Option<TreeFormat> {
    let text = std::fs::read_to_string(path).ok()?;
    Some(tree_io::sniff_format(&text))
}
