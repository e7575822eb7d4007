use clap::Subcommand;

/// Query to run against the loaded namespace.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List the immediate children of a directory
    Ls {
        #[clap(default_value = ".")]
        path: String,
    },
    /// Print the contents of a file
    Cat { path: String },
    /// Show the name, kind and size of an entry
    Stat {
        #[clap(default_value = ".")]
        path: String,
    },
    /// Print everything below a directory
    Tree {
        #[clap(default_value = ".")]
        path: String,
    },
}
