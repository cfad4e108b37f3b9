// vistahelper - migrate .NET project repositories to shared conventions

use vistahelper_cli::{output, CommandRouter};

fn main() {
    if let Err(e) = CommandRouter::route() {
        output::print_error(&e.user_message());
        if vistahelper_cli::VerbosityLevel::Verbose.should_output() {
            eprintln!("{}", e.technical_details());
        }
        std::process::exit(1);
    }
}
