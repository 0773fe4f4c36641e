use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use dialoguer::{Input, Select};

use k7_core::config::LayoutConfig;
use k7_core::context::ProjectContext;
use k7_core::error::K7Error;
use k7_core::injector::{DiskFs, DryRunFs};
use k7_core::project;
use k7_core::toolchain::{self, GitPolicy};
use k7_core::variant::{Selections, ServerVariant, StorageVariant};

use crate::output;

#[derive(Args, Debug, Clone, Default)]
pub struct InitArgs {
    /// Project name (creates a directory with this name)
    pub name: Option<String>,

    /// Storage variant (see `k7 list`)
    #[arg(long, env = "K7_STORAGE", value_parser = clap::value_parser!(StorageVariant))]
    pub storage: Option<StorageVariant>,

    /// Server framework variant (see `k7 list`)
    #[arg(long, env = "K7_SERVER", value_parser = clap::value_parser!(ServerVariant))]
    pub server: Option<ServerVariant>,

    /// What to do with git afterwards: commit, stage or skip
    #[arg(long, env = "K7_GIT", value_parser = clap::value_parser!(GitPolicy))]
    pub git: Option<GitPolicy>,

    /// Directory to create the project in (default: current directory)
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Go module path (default: the project name)
    #[arg(long)]
    pub module: Option<String>,

    /// JSON file overriding where each concern's files go
    #[arg(long)]
    pub layout: Option<PathBuf>,

    /// Render everything in memory and print the file list without writing
    #[arg(long)]
    pub dry_run: bool,

    /// Skip `go mod init`, `go get`, `go mod tidy` and `gofmt`
    #[arg(long)]
    pub skip_tools: bool,
}

/// Create a new project.
///
/// Anything not given on the command line is prompted for. The files are
/// rendered and written first; the Go toolchain and git run afterwards inside
/// the new directory.
pub async fn run(args: InitArgs) -> Result<()> {
    let name = match args.name.clone() {
        Some(name) => name,
        None => prompt_name()?,
    };
    project::validate_project_name(&name)?;

    output::print_header(&format!("k7 init: {name}"));

    let storage = match args.storage {
        Some(storage) => storage,
        None => select_storage()?,
    };
    let server = match args.server {
        Some(server) => server,
        None => select_server()?,
    };
    let git = match args.git {
        Some(git) => git,
        None if args.dry_run => GitPolicy::Skip,
        None => select_git()?,
    };
    let layout = match args.layout.as_deref() {
        Some(path) => LayoutConfig::load(path)?,
        None => LayoutConfig::default(),
    };

    let selections = Selections::new(storage, server);
    let root = project_root(args.path.as_deref(), &name)?;
    let context = ProjectContext::new(&name, &root, &selections)
        .with_module_path(args.module.as_deref().unwrap_or(&name))
        .with_git(git)
        .with_layout(&layout);

    output::print_key_value("storage", storage.display_name());
    output::print_key_value("server", server.display_name());
    output::print_key_value("module", context.module_path());
    output::print_key_value("git", git.as_str());

    if args.dry_run {
        return dry_run(&context);
    }

    if args.skip_tools {
        tracing::warn!("skipping go mod init, go get, go mod tidy and gofmt");
    }
    check_tools(git, args.skip_tools).await?;

    let total = if args.skip_tools { 3 } else { 4 };

    output::print_step(
        1,
        total,
        &format!("Creating project directory: {}", root.display()),
    );
    project::prepare_project_dir(&root)?;

    output::print_step(2, total, "Writing project files");
    let pb = output::spinner("Rendering templates...");
    let result = project::scaffold(&context, &mut DiskFs);
    pb.finish_and_clear();
    let (manifest, _) = result?;
    output::print_success(&format!("{} files written", manifest.len()));

    let mut step = 3;
    if !args.skip_tools {
        output::print_step(step, total, "Setting up Go modules");
        let pb = output::spinner("Running go mod init, go get and go mod tidy...");
        let result = go_setup(&root, context.module_path(), &selections).await;
        pb.finish_and_clear();
        result?;
        output::print_success("Go modules ready");
        step += 1;
    }

    output::print_step(step, total, &format!("Git: {}", git.description()));
    toolchain::apply_git_policy(&root, git).await?;

    output::print_success(&format!(
        "Project '{name}' created with {} and {}",
        storage.display_name(),
        server.display_name()
    ));
    println!();
    println!("  Next steps:");
    println!("    cd {}", root.display());
    println!("    make run");
    println!();

    Ok(())
}

/// Where the project directory goes: `<path or cwd>/<name>`, made absolute.
fn project_root(path: Option<&Path>, name: &str) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    let parent = match path {
        Some(p) if p.is_absolute() => p.to_path_buf(),
        Some(p) => cwd.join(p),
        None => cwd,
    };
    Ok(parent.join(name))
}

fn dry_run(context: &ProjectContext) -> Result<()> {
    let mut fs = DryRunFs::new();
    let (manifest, _) = project::scaffold(context, &mut fs)?;

    println!();
    println!(
        "  Would write {} files under {}:",
        manifest.len(),
        context.absolute_path().display()
    );
    for path in manifest.file_paths() {
        output::print_file(path);
    }
    println!();
    output::print_success("Dry run complete, nothing written");
    Ok(())
}

/// Fail before anything is written if a needed tool or the git identity
/// (`user.name` and `user.email`) is missing.
async fn check_tools(git: GitPolicy, skip_tools: bool) -> Result<()> {
    let tools: Vec<_> = toolchain::required_tools(git)
        .into_iter()
        .filter(|(name, _)| !skip_tools || *name == "git")
        .collect();

    if let Err(missing) = toolchain::check_prerequisites(&tools) {
        for m in &missing {
            output::print_warning(&format!(
                "Missing: {} (install: {})",
                m.tool_name, m.install_instructions
            ));
        }
        if let Some(first) = missing.into_iter().next() {
            return Err(K7Error::MissingTool {
                name: first.tool_name,
                install: first.install_instructions,
            }
            .into());
        }
    }

    if git.uses_git() {
        toolchain::check_git_identity(&std::env::current_dir()?).await?;
    }
    Ok(())
}

async fn go_setup(root: &Path, module_path: &str, selections: &Selections) -> Result<()> {
    toolchain::go_mod_init(root, module_path).await?;
    toolchain::go_get(root, &selections.go_packages()).await?;
    toolchain::go_mod_tidy(root).await?;
    toolchain::go_fmt(root).await?;
    Ok(())
}

fn prompt_name() -> Result<String> {
    let name = Input::<String>::new()
        .with_prompt("Project name")
        .validate_with(|input: &String| -> std::result::Result<(), String> {
            project::validate_project_name(input).map_err(|e| e.to_string())
        })
        .interact_text()?;
    Ok(name)
}

fn select_storage() -> Result<StorageVariant> {
    let items: Vec<String> = StorageVariant::ALL
        .iter()
        .map(|v| format!("{}: {}", v.display_name(), v.description()))
        .collect();
    let selection = Select::new()
        .with_prompt("Select a database")
        .items(&items)
        .default(0)
        .interact()?;
    Ok(StorageVariant::ALL[selection])
}

fn select_server() -> Result<ServerVariant> {
    let items: Vec<String> = ServerVariant::ALL
        .iter()
        .map(|v| format!("{}: {}", v.display_name(), v.description()))
        .collect();
    let selection = Select::new()
        .with_prompt("Select a server framework")
        .items(&items)
        .default(0)
        .interact()?;
    Ok(ServerVariant::ALL[selection])
}

fn select_git() -> Result<GitPolicy> {
    let items: Vec<&str> = GitPolicy::ALL.iter().map(GitPolicy::description).collect();
    let selection = Select::new()
        .with_prompt("Git")
        .items(&items)
        .default(0)
        .interact()?;
    Ok(GitPolicy::ALL[selection])
}
