use anyhow::Result;
use serde::Serialize;

use k7_core::toolchain::GitPolicy;
use k7_core::variant::{ServerVariant, StorageVariant};

use crate::output;

#[derive(Debug, Serialize)]
struct Choice {
    tag: &'static str,
    name: &'static str,
    description: &'static str,
}

#[derive(Debug, Serialize)]
struct Catalog {
    storage: Vec<Choice>,
    server: Vec<Choice>,
    git: Vec<Choice>,
}

fn catalog() -> Catalog {
    Catalog {
        storage: StorageVariant::ALL
            .iter()
            .map(|v| Choice {
                tag: v.tag(),
                name: v.display_name(),
                description: v.description(),
            })
            .collect(),
        server: ServerVariant::ALL
            .iter()
            .map(|v| Choice {
                tag: v.tag(),
                name: v.display_name(),
                description: v.description(),
            })
            .collect(),
        git: GitPolicy::ALL
            .iter()
            .map(|p| Choice {
                tag: p.as_str(),
                name: p.as_str(),
                description: p.description(),
            })
            .collect(),
    }
}

/// Print every concern with the variants it accepts.
pub fn run(json: bool) -> Result<()> {
    let catalog = catalog();

    if json {
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        return Ok(());
    }

    for (title, choices) in [
        ("storage (--storage)", &catalog.storage),
        ("server (--server)", &catalog.server),
        ("git (--git)", &catalog.git),
    ] {
        output::print_header(title);
        for choice in choices {
            output::print_key_value(choice.tag, choice.description);
        }
    }
    println!();

    Ok(())
}
