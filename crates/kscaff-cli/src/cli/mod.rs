//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, LogFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "kscaff",
    bin_name = "kscaff",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{26a1} Kubernetes controller scaffolding",
    long_about = "kscaff generates and extends Go projects for Kubernetes \
                  controllers: project skeletons, API types, controllers, \
                  webhooks and their kustomize manifests.",
    after_help = "EXAMPLES:\n\
        \x20 kscaff init --domain example.org --repo example.com/m\n\
        \x20 kscaff create api --group ship --version v1beta1 --kind Frigate\n\
        \x20 kscaff create webhook --group ship --version v1beta1 --kind Frigate --defaulting\n\
        \x20 kscaff completion bash > /usr/share/bash-completion/completions/kscaff",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Initialize a new project in the current directory.
    #[command(
        about = "Initialize a new project",
        after_help = "EXAMPLES:\n\
            \x20 kscaff init --domain example.org --repo example.com/m\n\
            \x20 kscaff init --domain example.org --license none --owner \"The Authors\"\n\
            \x20 kscaff init --domain example.org --project-version 3-alpha --project-name ship"
    )]
    Init(InitArgs),

    /// Scaffold a Kubernetes API or webhook.
    #[command(about = "Scaffold a Kubernetes API or webhook", subcommand)]
    Create(CreateCommands),

    /// Update project settings.
    #[command(
        about = "Update the project configuration",
        after_help = "EXAMPLES:\n\
            \x20 kscaff edit --multigroup=true\n\
            \x20 kscaff edit --multigroup=false"
    )]
    Edit(EditArgs),

    /// Refresh Go module dependencies.
    #[command(about = "Update vendor dependencies")]
    Update,

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 kscaff completion bash > ~/.local/share/bash-completion/completions/kscaff\n\
            \x20 kscaff completion zsh  > ~/.zfunc/_kscaff\n\
            \x20 kscaff completion fish > ~/.config/fish/completions/kscaff.fish"
    )]
    Completion(CompletionArgs),

    /// Print the kscaff version.
    #[command(about = "Print the kscaff version")]
    Version,

    /// Manage the kscaff configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 kscaff config path\n\
            \x20 kscaff config show\n\
            \x20 kscaff config init --force"
    )]
    Config(ConfigCommands),
}

/// Subcommands for `kscaff create`.
#[derive(Debug, Subcommand)]
pub enum CreateCommands {
    /// Scaffold a Kubernetes API: types, CRD manifests and a controller.
    #[command(after_help = "EXAMPLES:\n\
        \x20 kscaff create api --group ship --version v1beta1 --kind Frigate\n\
        \x20 kscaff create api --group apps --version v1 --kind Deployment --resource=false --controller\n\
        \x20 kscaff create api --group ship --version v1 --kind Frigate --pattern addon")]
    Api(ApiArgs),

    /// Scaffold a webhook for an existing API.
    #[command(after_help = "EXAMPLES:\n\
        \x20 kscaff create webhook --group ship --version v1beta1 --kind Frigate --defaulting\n\
        \x20 kscaff create webhook --group ship --version v1beta1 --kind Frigate --conversion")]
    Webhook(WebhookArgs),
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `kscaff init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Domain for API groups.  Falls back to the configured default.
    #[arg(long = "domain", value_name = "DOMAIN", help = "Domain for groups")]
    pub domain: Option<String>,

    /// Go module path.  Read from an existing `go.mod` when omitted.
    #[arg(
        long = "repo",
        value_name = "MODULE",
        help = "Name to use for the go module (e.g. github.com/user/repo)"
    )]
    pub repo: Option<String>,

    /// Project name, used as the kustomize prefix.
    #[arg(
        long = "project-name",
        value_name = "NAME",
        help = "Project name (defaults to the directory name)"
    )]
    pub project_name: Option<String>,

    /// PROJECT file version.
    #[arg(
        long = "project-version",
        value_name = "VERSION",
        default_value = "2",
        help = "Project version (2 or 3-alpha)"
    )]
    pub project_version: String,

    /// License header written to the boilerplate.
    #[arg(
        long = "license",
        value_name = "LICENSE",
        help = "License to use for the boilerplate (apache2 or none)"
    )]
    pub license: Option<String>,

    /// Copyright owner.
    #[arg(long = "owner", value_name = "OWNER", help = "Owner to add to the copyright")]
    pub owner: Option<String>,

    /// Run `go mod tidy` after scaffolding.
    #[arg(
        long = "fetch-deps",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = true,
        default_missing_value = "true",
        help = "Ensure dependencies are downloaded"
    )]
    pub fetch_deps: bool,

    /// Manager image referenced by the Makefile and manifests.
    #[arg(long = "image", value_name = "IMAGE", help = "Controller manager image")]
    pub image: Option<String>,
}

// ── create ────────────────────────────────────────────────────────────────────

/// Group, version and kind flags shared by `create api` and `create webhook`.
#[derive(Debug, Args)]
pub struct ResourceArgs {
    #[arg(long = "group", value_name = "GROUP", help = "Resource group")]
    pub group: String,

    #[arg(long = "version", value_name = "VERSION", help = "Resource version")]
    pub version: String,

    #[arg(long = "kind", value_name = "KIND", help = "Resource kind")]
    pub kind: String,

    #[arg(
        long = "resource-plural",
        value_name = "PLURAL",
        help = "Resource plural (defaults to the lowercased kind plural)"
    )]
    pub plural: Option<String>,

    #[arg(
        long = "namespaced",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = true,
        default_missing_value = "true",
        help = "Resource is namespaced"
    )]
    pub namespaced: bool,
}

/// Arguments for `kscaff create api`.
#[derive(Debug, Args)]
pub struct ApiArgs {
    #[command(flatten)]
    pub resource: ResourceArgs,

    /// Scaffold the API types.  Prompted for when omitted on a terminal.
    #[arg(
        long = "resource",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        help = "If set, generate the resource without prompting the user"
    )]
    pub do_resource: Option<bool>,

    /// Scaffold the controller.  Prompted for when omitted on a terminal.
    #[arg(
        long = "controller",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        help = "If set, generate the controller without prompting the user"
    )]
    pub do_controller: Option<bool>,

    /// Run `make generate` afterwards.  Falls back to the configured default.
    #[arg(
        long = "make",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        help = "If true, run make after generating files"
    )]
    pub run_make: Option<bool>,

    /// Overwrite files that were already scaffolded.
    #[arg(long = "force", help = "Attempt to create resource even if it already exists")]
    pub force: bool,

    /// Generation pattern applied after rendering.
    #[arg(
        long = "pattern",
        value_name = "PATTERN",
        help = "Generate resource using a pattern (supported: addon)"
    )]
    pub pattern: Option<String>,
}

/// Arguments for `kscaff create webhook`.
#[derive(Debug, Args)]
pub struct WebhookArgs {
    #[command(flatten)]
    pub resource: ResourceArgs,

    #[arg(long = "defaulting", help = "Scaffold a mutating webhook")]
    pub defaulting: bool,

    #[arg(
        long = "programmatic-validation",
        help = "Scaffold a validating webhook"
    )]
    pub validating: bool,

    #[arg(long = "conversion", help = "Scaffold a conversion webhook")]
    pub conversion: bool,
}

// ── edit ──────────────────────────────────────────────────────────────────────

/// Arguments for `kscaff edit`.
#[derive(Debug, Args)]
pub struct EditArgs {
    #[arg(
        long = "multigroup",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        help = "Enable or disable the multi-group layout"
    )]
    pub multigroup: bool,
}

// ── completion ────────────────────────────────────────────────────────────────

/// Arguments for `kscaff completion`.
#[derive(Debug, Args)]
pub struct CompletionArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `kscaff config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the path to the user configuration file.
    Path,
    /// Print the effective configuration.
    Show,
    /// Write a configuration file with the built-in defaults.
    Init {
        /// Overwrite an existing config file.
        #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
        force: bool,
    },
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_create_api() {
        let cli = Cli::parse_from([
            "kscaff", "create", "api", "--group", "ship", "--version", "v1beta1", "--kind",
            "Frigate",
        ]);
        let Commands::Create(CreateCommands::Api(args)) = cli.command else {
            panic!("expected create api");
        };
        assert_eq!(args.resource.kind, "Frigate");
        assert!(args.resource.namespaced);
        assert_eq!(args.do_resource, None);
        assert_eq!(args.run_make, None);
    }

    #[test]
    fn bool_flags_accept_bare_and_explicit_values() {
        let cli = Cli::parse_from([
            "kscaff",
            "create",
            "api",
            "--group",
            "ship",
            "--version",
            "v1",
            "--kind",
            "Frigate",
            "--resource",
            "--controller=false",
            "--namespaced=false",
            "--make=false",
        ]);
        let Commands::Create(CreateCommands::Api(args)) = cli.command else {
            panic!("expected create api");
        };
        assert_eq!(args.do_resource, Some(true));
        assert_eq!(args.do_controller, Some(false));
        assert_eq!(args.run_make, Some(false));
        assert!(!args.resource.namespaced);
    }

    #[test]
    fn init_defaults() {
        let cli = Cli::parse_from(["kscaff", "init"]);
        let Commands::Init(args) = cli.command else {
            panic!("expected init");
        };
        assert!(args.fetch_deps);
        assert_eq!(args.project_version, "2");
        assert_eq!(args.domain, None);
    }

    #[test]
    fn edit_multigroup_flag() {
        let cli = Cli::parse_from(["kscaff", "edit", "--multigroup"]);
        assert!(matches!(cli.command, Commands::Edit(EditArgs { multigroup: true })));
    }

    #[test]
    fn create_api_requires_a_kind() {
        let result = Cli::try_parse_from(["kscaff", "create", "api", "--group", "ship", "--version", "v1"]);
        assert!(result.is_err());
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["kscaff", "--quiet", "--verbose", "version"]);
        assert!(result.is_err());
    }
}
