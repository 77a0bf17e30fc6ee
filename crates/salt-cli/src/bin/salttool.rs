use std::process;

use clap::{Parser, Subcommand};

use salt_cli::commands::search_ops::ServiceArgs;
use salt_cli::commands::{config_ops, read_input, search_ops, translit_ops};

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

#[derive(Parser)]
#[command(name = "salttool", about = "Sanskrit transliteration and dictionary client tool")]
struct Cli {
    /// Custom scheme TOML, replacing the built-in schemes
    #[arg(long, global = true)]
    schemes: Option<String>,
    /// Custom settings TOML
    #[arg(long, global = true)]
    settings: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Transliterate text between two scheme ids
    Translit {
        /// Source scheme id
        from: String,
        /// Target scheme id
        to: String,
        /// Text (reads stdin if omitted)
        text: Option<String>,
    },
    /// Like translit, but show the failure marker instead of failing
    Render {
        from: String,
        to: String,
        text: Option<String>,
    },
    /// Print the scheme a language tag denotes
    SchemeOf {
        /// Language tag, e.g. sa-x-iso
        tag: String,
    },
    /// Whether text tagged A must be transliterated to display as B
    Need { a: String, b: String },
    /// Choose the scheme a query is sent in
    Negotiate {
        /// Query text
        text: String,
        /// User's scheme (tag or bare id)
        #[arg(long, default_value = "x-iso")]
        scheme: String,
        /// Schemes the service accepts (tags or bare ids)
        #[arg(long, value_delimiter = ',', required = true)]
        accept: Vec<String>,
        /// Preference order (defaults to settings)
        #[arg(long, value_delimiter = ',')]
        prefer: Option<Vec<String>>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Sanitize an HTML fragment and transliterate its headword elements
    Html {
        /// Scheme the fragment is written in (tag or bare id)
        from: String,
        /// Scheme to display (tag or bare id)
        to: String,
        /// HTML file, or - for stdin
        #[arg(default_value = "-")]
        file: String,
    },
    /// Show how a grapheme tokenizes in a scheme
    Lookup { scheme: String, grapheme: String },
    /// List the selectable schemes
    Schemes {
        #[arg(long)]
        json: bool,
    },
    /// Export default schemes as TOML
    SchemesExport,
    /// Validate a custom schemes TOML file
    SchemesValidate { file: String },
    /// Export default settings as TOML
    SettingsExport,
    /// Validate a custom settings TOML file
    SettingsValidate { file: String },
    /// Search the selected dictionary services
    Search {
        /// Service list: URL or JSON file
        #[arg(long)]
        services: String,
        /// Service ids to query
        #[arg(long, value_delimiter = ',', required = true)]
        select: Vec<String>,
        /// Query scheme (tag or bare id)
        #[arg(long, default_value = "x-iso")]
        scheme: String,
        /// Search article text instead of headwords
        #[arg(long)]
        fulltext: bool,
        #[arg(long)]
        json: bool,
        query: String,
    },
    /// Fetch an article and render it
    Article {
        #[arg(long)]
        services: String,
        /// Display scheme (tag or bare id)
        #[arg(long, default_value = "x-iso")]
        scheme: String,
        /// Headword path the article was reached from
        #[arg(long, default_value = "")]
        headwords_url: String,
        service: String,
        /// Article path, e.g. articles/3
        articles_url: String,
    },
}

fn text_or_stdin(text: Option<String>) -> String {
    match text {
        Some(t) => t,
        None => die!(read_input("-"), "Error: {}"),
    }
}

fn main() {
    let cli = Cli::parse();
    die!(
        config_ops::load_custom(cli.schemes.as_deref(), cli.settings.as_deref()),
        "Error loading config: {}"
    );

    let output = match cli.command {
        Command::Translit { from, to, text } => {
            die!(translit_ops::translit(&text_or_stdin(text), &from, &to), "Error: {}")
        }
        Command::Render { from, to, text } => {
            translit_ops::render(&text_or_stdin(text), &from, &to)
        }
        Command::SchemeOf { tag } => translit_ops::scheme_of(&tag),
        Command::Need { a, b } => translit_ops::need(&a, &b),
        Command::Negotiate {
            text,
            scheme,
            accept,
            prefer,
            json,
        } => die!(
            translit_ops::negotiate_cmd(&text, &scheme, &accept, prefer.as_deref(), json),
            "Error: {}"
        ),
        Command::Html { from, to, file } => {
            die!(translit_ops::html(&file, &from, &to), "Error: {}")
        }
        Command::Lookup { scheme, grapheme } => {
            die!(translit_ops::lookup(&scheme, &grapheme), "Error: {}")
        }
        Command::Schemes { json } => die!(translit_ops::schemes(json), "Error: {}"),
        Command::SchemesExport => config_ops::schemes_export().to_string(),
        Command::SchemesValidate { file } => {
            die!(config_ops::schemes_validate(&file), "Error: {}")
        }
        Command::SettingsExport => config_ops::settings_export().to_string(),
        Command::SettingsValidate { file } => {
            die!(config_ops::settings_validate(&file), "Error: {}")
        }
        Command::Search {
            services,
            select,
            scheme,
            fulltext,
            json,
            query,
        } => {
            let args = ServiceArgs {
                services: &services,
                select: &select,
            };
            die!(
                search_ops::search(&args, &query, &scheme, fulltext, json),
                "Error: {}"
            )
        }
        Command::Article {
            services,
            scheme,
            headwords_url,
            service,
            articles_url,
        } => {
            let args = ServiceArgs {
                services: &services,
                select: &[],
            };
            die!(
                search_ops::article(&args, &service, &articles_url, &headwords_url, &scheme),
                "Error: {}"
            )
        }
    };

    if output.ends_with('\n') {
        print!("{output}");
    } else {
        println!("{output}");
    }
}
