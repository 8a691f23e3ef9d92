use crate::error::CreateError;

#[macro_export]
macro_rules! error {
    ($($arg:tt)+) => {
        {
            use owo_colors::OwoColorize;

            eprintln!(
                "{}: {}",
                "error".if_supports_color(owo_colors::Stream::Stderr, |s| s
                        .style(owo_colors::Style::new().bold().red())),
                format_args!($($arg)*)
            );
        }
    }
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)+) => {
        {
            use owo_colors::OwoColorize;

            println!(
                "{}: {}",
                "info".if_supports_color(owo_colors::Stream::Stdout, |s| s
                        .style(owo_colors::Style::new().bold().green())),
                format_args!($($arg)*)
            );
        }
    }
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)+) => {
        {
            use owo_colors::OwoColorize;

            println!(
                "{}: {}",
                "warning".if_supports_color(owo_colors::Stream::Stdout, |s| s
                        .style(owo_colors::Style::new().bold().yellow())),
                format_args!($($arg)*)
            );
        }
    };
}

#[macro_export]
macro_rules! trace {
    ($($arg:tt)+) => {
        {
            use owo_colors::OwoColorize;

            if std::env::var("CREATE_APP_TRACE").is_ok() {
                println!(
                    "{}: {}",
                    "trace".if_supports_color(owo_colors::Stream::Stdout, |s| s
                            .style(owo_colors::Style::new().bold())),
                    format_args!($($arg)*)
                );
            }
        }
    }
}

/// Prints the detail lines that belong to an error after its headline.
pub fn report(err: &CreateError) {
    use owo_colors::OwoColorize;

    let names = match err {
        CreateError::NameCollision { reserved, .. } => {
            eprintln!(
                "\nFollowing names {} be used:\n",
                "must not".if_supports_color(owo_colors::Stream::Stderr, |s| s
                    .style(owo_colors::Style::new().bold().red()))
            );
            reserved
        }
        CreateError::UnsafeDirectory { conflicts, .. } => {
            eprintln!("\nConflicting entries:\n");
            conflicts
        }
        _ => return,
    };

    for name in names {
        eprintln!(
            "  {}",
            name.if_supports_color(owo_colors::Stream::Stderr, |s| s.cyan())
        );
    }
}
