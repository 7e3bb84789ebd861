use recruiter_outreach_cli::run;

fn main() {
    if let Err(err) = run() {
        eprintln!("application error: {err}");
        let code = if err.is_user_input() { 2 } else { 1 };
        std::process::exit(code);
    }
}
