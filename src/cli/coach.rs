//! Coach command implementation

use anyhow::Result;

use habitquest::coach::Coach;
use habitquest::config::Config;
use habitquest::HabitQuest;

/// Ask a question, or show progress insights when none is given. Without
/// an API key the coach answers with its fallback text.
pub fn coach_command(app: &HabitQuest, config: &Config, question: Option<&str>) -> Result<()> {
    let coach = Coach::from_settings(&config.coach);
    let ctx = app.coach_context();

    match question.map(str::trim).filter(|q| !q.is_empty()) {
        Some(question) => println!("{}", coach.ask(question, &ctx)),
        None => match coach.insights(&ctx) {
            Some(text) => println!("{}", text),
            None => println!("Add a habit first so the coach has something to look at."),
        },
    }
    Ok(())
}
