use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "icat-admin")]
#[command(about = "Browse and administer an ICAT data catalog")]
pub struct Cli {
    /// Connection slot to use (defaults to the last one)
    #[arg(short, long, global = true)]
    pub connection: Option<u32>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in to a catalog server and remember the session
    Login {
        /// Server URL, e.g. https://icat.example.org
        server: String,
        username: String,
        /// Authentication plugin (default from settings)
        #[arg(short, long)]
        plugin: Option<String>,
        /// Password; prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// End the session of a connection
    Logout,
    /// List saved connections
    Connections {
        /// Ask each server whether the session is still valid
        #[arg(long)]
        check: bool,
    },
    /// Show one page of an entity table
    Browse(TableArgs),
    /// Count the rows matching a filter
    Count {
        entity: String,
        #[arg(short, long)]
        r#where: Option<String>,
    },
    /// Follow a relation from one row
    Related {
        entity: String,
        id: i64,
        field: String,
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Delete rows by id
    Delete {
        entity: String,
        #[arg(required = true)]
        ids: Vec<i64>,
    },
    /// Create a row from field=value assignments
    Create {
        entity: String,
        #[arg(required = true)]
        fields: Vec<String>,
    },
    /// Change fields of one row
    Update {
        entity: String,
        id: i64,
        #[arg(required = true)]
        fields: Vec<String>,
    },
    /// Point a to-one relation of many rows at a new parent
    Move {
        entity: String,
        field: String,
        target: i64,
        #[arg(required = true)]
        ids: Vec<i64>,
    },
}

#[derive(Args)]
pub struct TableArgs {
    pub entity: String,
    /// Where clause; bare field names get the entity alias
    #[arg(short, long)]
    pub r#where: Option<String>,
    #[arg(short, long)]
    pub sort: Option<String>,
    #[arg(long)]
    pub desc: bool,
    /// 1-based page number
    #[arg(short, long, default_value_t = 1)]
    pub page: u32,
    /// Rows per page (default from settings)
    #[arg(short, long)]
    pub limit: Option<u32>,
    /// Relations to include, e.g. facility or investigation.facility
    #[arg(short, long)]
    pub include: Vec<String>,
    /// Show audit columns too
    #[arg(short, long)]
    pub all_columns: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_browse_arguments() {
        let cli = Cli::try_parse_from([
            "icat-admin", "-c", "2", "browse", "Dataset", "-w", "name like 'A%'", "-s", "name", "--desc",
            "-p", "3", "-i", "investigation",
        ])
        .unwrap();

        assert_eq!(cli.connection, Some(2));
        let Commands::Browse(args) = cli.command else {
            panic!("expected browse");
        };
        assert_eq!(args.entity, "Dataset");
        assert_eq!(args.r#where.as_deref(), Some("name like 'A%'"));
        assert!(args.desc);
        assert_eq!(args.page, 3);
        assert_eq!(args.include, vec!["investigation".to_string()]);
    }

    #[test]
    fn test_delete_requires_ids() {
        assert!(Cli::try_parse_from(["icat-admin", "delete", "Facility"]).is_err());
        let cli = Cli::try_parse_from(["icat-admin", "delete", "Facility", "4", "5"]).unwrap();
        assert!(matches!(cli.command, Commands::Delete { ref ids, .. } if ids == &[4, 5]));
    }
}
