use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::api::{BlogSort, ListParams, ShardEntity};
use crate::constants::{DEFAULT_PAGE, DEFAULT_PAGE_LIMIT};

#[derive(Parser, Debug)]
#[command(name = "blogdesk")]
#[command(version)]
#[command(about = "Command-line client for the blog service", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL (overrides the configuration)
    #[arg(long, global = true, env = "BLOGDESK_BASE_URL")]
    pub base_url: Option<String>,

    /// Output format (defaults to the configured one)
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Keep the session in memory only; nothing is read from or written to disk
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default configuration file
    Init,
    /// Show backend, session storage and login state
    Status,
    /// Create an account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "BLOGDESK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Log in and remember the session
    Login {
        /// Username or email
        #[arg(short, long = "user")]
        username_email: String,
        #[arg(long, env = "BLOGDESK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Profiles and account settings
    #[command(subcommand)]
    User(UserCommand),
    /// Read and write blog posts
    #[command(subcommand)]
    Blog(BlogCommand),
    /// Sharding dashboard
    #[command(subcommand)]
    Admin(AdminCommand),
}

#[derive(Subcommand, Debug)]
pub enum UserCommand {
    /// Show the signed-in user
    Me,
    /// Show a user's profile
    Show { id: i64 },
    /// Change account settings; omitted fields stay as they are
    Update {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        name: Option<String>,
        /// New password (empty keeps the current one)
        #[arg(long)]
        password: Option<String>,
    },
    /// Delete the signed-in account
    Delete {
        /// Current password, required by the backend
        #[arg(long, env = "BLOGDESK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// List a user's posts
    Blogs {
        id: i64,
        #[command(flatten)]
        list: ListArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum BlogCommand {
    /// List posts
    List(ListArgs),
    /// Show one post
    Show { id: i64 },
    /// Write a new post
    Create {
        #[arg(long)]
        title: String,
        #[command(flatten)]
        body: BodyArgs,
    },
    /// Edit an existing post
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[command(flatten)]
        body: BodyArgs,
    },
    /// Delete a post
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum AdminCommand {
    /// Shard status table
    Shards,
    /// Users and blogs per shard
    Distribution,
    /// Move a user or blog to another shard
    Migrate {
        #[arg(long = "type", value_enum)]
        entity: EntityArg,
        #[arg(long)]
        id: i64,
        /// Target shard name
        #[arg(long)]
        target: String,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    #[arg(long, default_value_t = DEFAULT_PAGE)]
    pub page: u32,
    #[arg(long, default_value_t = DEFAULT_PAGE_LIMIT)]
    pub limit: u32,
    #[arg(long, value_enum, default_value_t = SortArg::Latest)]
    pub sort: SortArg,
}

impl ListArgs {
    pub fn params(&self) -> ListParams {
        ListParams {
            page: Some(self.page),
            limit: Some(self.limit),
            sort: Some(self.sort.into()),
        }
    }
}

#[derive(Args, Debug, Clone)]
#[group(multiple = false)]
pub struct BodyArgs {
    /// Post body text
    #[arg(long)]
    pub body: Option<String>,
    /// Read the post body from a file
    #[arg(long)]
    pub body_file: Option<PathBuf>,
}

impl BodyArgs {
    pub fn read(&self) -> std::io::Result<Option<String>> {
        match (&self.body, &self.body_file) {
            (Some(body), _) => Ok(Some(body.clone())),
            (None, Some(path)) => std::fs::read_to_string(path).map(Some),
            (None, None) => Ok(None),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    Latest,
    Oldest,
    /// Per-user listings only
    Popular,
}

impl From<SortArg> for BlogSort {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Latest => BlogSort::Latest,
            SortArg::Oldest => BlogSort::Oldest,
            SortArg::Popular => BlogSort::Popular,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EntityArg {
    User,
    Blog,
}

impl From<EntityArg> for ShardEntity {
    fn from(value: EntityArg) -> Self {
        match value {
            EntityArg::User => ShardEntity::User,
            EntityArg::Blog => ShardEntity::Blog,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON structured output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_blog_list_defaults() {
        let cli = Cli::try_parse_from(["blogdesk", "blog", "list"]).unwrap();
        match cli.command {
            Commands::Blog(BlogCommand::List(list)) => {
                assert_eq!(
                    list.params(),
                    ListParams {
                        page: Some(1),
                        limit: Some(10),
                        sort: Some(BlogSort::Latest),
                    }
                );
            }
            other => panic!("Unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "blogdesk", "blog", "show", "4", "--output", "json", "--ephemeral",
        ])
        .unwrap();
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert!(cli.ephemeral);
    }

    #[test]
    fn test_body_and_body_file_conflict() {
        let result = Cli::try_parse_from([
            "blogdesk", "blog", "create", "--title", "t", "--body", "b", "--body-file", "x.md",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_migrate_args() {
        let cli = Cli::try_parse_from([
            "blogdesk", "admin", "migrate", "--type", "blog", "--id", "9", "--target", "shard_b",
        ])
        .unwrap();
        match cli.command {
            Commands::Admin(AdminCommand::Migrate { entity, id, target }) => {
                assert_eq!(ShardEntity::from(entity), ShardEntity::Blog);
                assert_eq!(id, 9);
                assert_eq!(target, "shard_b");
            }
            other => panic!("Unexpected command: {:?}", other),
        }
    }
}
