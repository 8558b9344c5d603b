//! Prompt construction

use serde::Serialize;

/// Per-habit numbers the coach sees
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitSummary {
    pub name: String,
    pub streak: u32,
    pub completion_rate: u32,
    pub done_today: bool,
}

/// Snapshot of the user's progress handed to every prompt
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CoachContext {
    pub level: u32,
    pub xp: u64,
    pub habits: Vec<HabitSummary>,
    pub tasks_completed: usize,
    pub tasks_total: usize,
}

impl CoachContext {
    fn habit_names(&self) -> String {
        if self.habits.is_empty() {
            return "none".to_string();
        }
        self.habits
            .iter()
            .map(|h| h.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub(crate) fn chat_prompt(&self, question: &str) -> String {
        format!(
            "You are a supportive habit & productivity coach.\n\
             User is level {} with {} XP.\n\
             Habits: {}\n\
             Tasks today: {}/{}\n\n\
             User: {}\n\n\
             Respond in 2-4 sentences. Be encouraging, practical and personal.",
            self.level,
            self.xp,
            self.habit_names(),
            self.tasks_completed,
            self.tasks_total,
            question.trim()
        )
    }

    pub(crate) fn insights_prompt(&self) -> String {
        let habits = self
            .habits
            .iter()
            .map(|h| {
                format!(
                    "- {}: {} streak, {}% completion",
                    h.name, h.streak, h.completion_rate
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "You are an excellent personal productivity coach.\n\n\
             User level: {} ({} XP)\n\
             Habits:\n{}\n\n\
             Tasks today: {}/{}\n\n\
             Write 4-6 sentences:\n\
             1. Warm congratulations on current level & progress\n\
             2. One interesting pattern you notice\n\
             3. One concrete suggestion to reach next level faster\n\
             4. Short motivational closing\n\n\
             Tone: supportive, wise, slightly playful",
            self.level, self.xp, habits, self.tasks_completed, self.tasks_total
        )
    }

    pub(crate) fn tasks_prompt(&self) -> String {
        let recent = self
            .habits
            .iter()
            .map(|h| format!("{}: {}", h.name, if h.done_today { "yes" } else { "no" }))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "Generate 5 personalized daily tasks for today.\n\
             Support existing habits: {}\n\
             Recent completions: {}\n\n\
             Tasks should be:\n\
             - specific & actionable\n\
             - mix of quick wins and meaningful work\n\
             - support work-life balance\n\n\
             Return ONLY valid JSON array of strings:\n\
             [\"Task one\", \"Task two\", ...]",
            self.habit_names(),
            recent
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompts_mention_state() {
        let ctx = CoachContext {
            level: 4,
            xp: 320,
            habits: vec![HabitSummary {
                name: "Read".into(),
                streak: 6,
                completion_rate: 80,
                done_today: true,
            }],
            tasks_completed: 1,
            tasks_total: 3,
        };
        assert!(ctx.chat_prompt("  how? ").contains("User: how?"));
        assert!(ctx.insights_prompt().contains("- Read: 6 streak, 80% completion"));
        assert!(ctx.tasks_prompt().contains("Recent completions: Read: yes"));
        assert!(CoachContext::default().tasks_prompt().contains("Support existing habits: none"));
    }
}
