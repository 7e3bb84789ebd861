mod cli;
mod commands;
mod console;

use recruiter_outreach::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
