use crate::sheets::{ReviewStatus, Submission};

/// The three terminal decisions a reviewer can record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewOutcome {
    ReadyToSend,
    NeedsImprovement,
    Rejected,
}

impl ReviewOutcome {
    pub const ALL: [ReviewOutcome; 3] = [
        ReviewOutcome::NeedsImprovement,
        ReviewOutcome::ReadyToSend,
        ReviewOutcome::Rejected,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            ReviewOutcome::ReadyToSend => "ready-to-send",
            ReviewOutcome::NeedsImprovement => "needs-improvement",
            ReviewOutcome::Rejected => "rejected",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|o| o.slug() == slug)
    }

    pub fn label(self) -> &'static str {
        match self {
            ReviewOutcome::ReadyToSend => ReviewStatus::READY_TO_SEND,
            ReviewOutcome::NeedsImprovement => ReviewStatus::NEEDS_IMPROVEMENT,
            ReviewOutcome::Rejected => ReviewStatus::REJECTED,
        }
    }

    pub fn status(self) -> ReviewStatus {
        match self {
            ReviewOutcome::ReadyToSend => ReviewStatus::ReadyToSend,
            ReviewOutcome::NeedsImprovement => ReviewStatus::NeedsImprovement,
            ReviewOutcome::Rejected => ReviewStatus::Rejected,
        }
    }
}

/// Reviewer input for the selected letter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewDraft {
    pub reviewer_name: String,
    pub letter_content: String,
    pub notes: String,
    pub review_completed: bool,
}

impl ReviewDraft {
    /// Outcome buttons are live only once the review is confirmed and signed.
    pub fn actions_enabled(&self) -> bool {
        self.review_completed && !self.reviewer_name.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewBlocked {
    NothingSelected,
    NotConfirmed,
    MissingReviewer,
}

impl ReviewBlocked {
    pub fn message(self) -> &'static str {
        match self {
            ReviewBlocked::NothingSelected => "يرجى اختيار خطاب للمراجعة",
            ReviewBlocked::NotConfirmed => "يرجى تأكيد إتمام المراجعة أولاً",
            ReviewBlocked::MissingReviewer => "يرجى إدخال اسم المراجع",
        }
    }
}

#[derive(Debug, Clone)]
struct Selection {
    id: String,
    draft: ReviewDraft,
}

/// Browsing → reviewing → decided. Decisions change this session's copy of
/// the submission list only; they are not written back to the sheet.
#[derive(Debug, Clone, Default)]
pub struct ReviewSession {
    letters: Vec<Submission>,
    selection: Option<Selection>,
}

impl ReviewSession {
    pub fn new(letters: Vec<Submission>) -> Self {
        Self {
            letters,
            selection: None,
        }
    }

    pub fn letters(&self) -> &[Submission] {
        &self.letters
    }

    pub fn is_reviewing(&self) -> bool {
        self.selection.is_some()
    }

    pub fn selected(&self) -> Option<&Submission> {
        let selection = self.selection.as_ref()?;
        self.letters.iter().find(|l| l.id == selection.id)
    }

    pub fn draft(&self) -> Option<&ReviewDraft> {
        self.selection.as_ref().map(|s| &s.draft)
    }

    /// Starts reviewing `id` with a fresh buffer holding its current content.
    /// Returns false and stays browsing when the id is unknown.
    pub fn select(&mut self, id: &str) -> bool {
        let Some(letter) = self.letters.iter().find(|l| l.id == id) else {
            return false;
        };
        self.selection = Some(Selection {
            id: letter.id.clone(),
            draft: ReviewDraft {
                letter_content: letter.content.clone(),
                ..ReviewDraft::default()
            },
        });
        true
    }

    pub fn update_draft(&mut self, draft: ReviewDraft) {
        if let Some(selection) = self.selection.as_mut() {
            selection.draft = draft;
        }
    }

    /// Back to the list; unsaved edits are discarded.
    pub fn back_to_list(&mut self) {
        self.selection = None;
    }

    pub fn apply(&mut self, outcome: ReviewOutcome) -> Result<&Submission, ReviewBlocked> {
        let selection = self.selection.as_ref().ok_or(ReviewBlocked::NothingSelected)?;
        if !selection.draft.review_completed {
            return Err(ReviewBlocked::NotConfirmed);
        }
        if selection.draft.reviewer_name.trim().is_empty() {
            return Err(ReviewBlocked::MissingReviewer);
        }

        let id = selection.id.clone();
        self.selection = None;
        let letter = self
            .letters
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or(ReviewBlocked::NothingSelected)?;
        letter.review = outcome.status();
        Ok(&*letter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letter(id: &str, content: &str) -> Submission {
        Submission {
            id: id.into(),
            date: "01/01/2024".into(),
            content: content.into(),
            letter_type: "جديد".into(),
            recipient: "الإدارة".into(),
            subject: "موضوع".into(),
            review: ReviewStatus::Pending,
            sent: ReviewStatus::PENDING.into(),
        }
    }

    fn session() -> ReviewSession {
        ReviewSession::new(vec![letter("A", "نص أ"), letter("B", "نص ب")])
    }

    fn statuses(session: &ReviewSession) -> Vec<ReviewStatus> {
        session.letters().iter().map(|l| l.review.clone()).collect()
    }

    #[test]
    fn selecting_snapshots_content_into_buffer() {
        let mut session = session();
        assert!(session.select("B"));
        assert!(session.is_reviewing());
        let draft = session.draft().expect("draft");
        assert_eq!(draft.letter_content, "نص ب");
        assert!(draft.reviewer_name.is_empty());
        assert!(!draft.review_completed);
        assert!(!draft.actions_enabled());
    }

    #[test]
    fn unknown_id_stays_browsing() {
        let mut session = session();
        assert!(!session.select("Z"));
        assert!(!session.is_reviewing());
    }

    #[test]
    fn back_to_list_discards_edits() {
        let mut session = session();
        session.select("A");
        session.update_draft(ReviewDraft {
            reviewer_name: "سارة".into(),
            letter_content: "تعديل".into(),
            notes: "ملاحظة".into(),
            review_completed: true,
        });
        session.back_to_list();
        assert!(session.draft().is_none());

        session.select("A");
        assert_eq!(session.draft().expect("draft").letter_content, "نص أ");
        assert_eq!(session.letters()[0].content, "نص أ");
    }

    #[test]
    fn unchecked_completion_blocks_every_outcome() {
        for outcome in ReviewOutcome::ALL {
            let mut session = session();
            session.select("A");
            session.update_draft(ReviewDraft {
                reviewer_name: "سارة".into(),
                letter_content: "نص أ".into(),
                notes: String::new(),
                review_completed: false,
            });
            let before = statuses(&session);
            assert_eq!(
                session.apply(outcome).map(|l| l.id.clone()),
                Err(ReviewBlocked::NotConfirmed)
            );
            assert_eq!(statuses(&session), before);
            assert!(session.is_reviewing());
        }
    }

    #[test]
    fn missing_reviewer_blocks_outcome() {
        let mut session = session();
        session.select("A");
        session.update_draft(ReviewDraft {
            reviewer_name: "  ".into(),
            review_completed: true,
            ..ReviewDraft::default()
        });
        assert_eq!(
            session.apply(ReviewOutcome::Rejected).map(|l| l.id.clone()),
            Err(ReviewBlocked::MissingReviewer)
        );
        assert!(statuses(&session).iter().all(|s| *s == ReviewStatus::Pending));
    }

    #[test]
    fn nothing_selected_is_blocked() {
        let mut session = session();
        assert_eq!(
            session.apply(ReviewOutcome::ReadyToSend).map(|l| l.id.clone()),
            Err(ReviewBlocked::NothingSelected)
        );
    }

    #[test]
    fn permitted_outcome_updates_only_selected_letter() {
        let mut session = session();
        session.select("B");
        session.update_draft(ReviewDraft {
            reviewer_name: "سارة".into(),
            letter_content: "نص ب".into(),
            notes: String::new(),
            review_completed: true,
        });
        let updated = session.apply(ReviewOutcome::ReadyToSend).expect("applied");
        assert_eq!(updated.id, "B");
        assert_eq!(updated.review.label(), ReviewStatus::READY_TO_SEND);

        assert_eq!(
            statuses(&session),
            vec![ReviewStatus::Pending, ReviewStatus::ReadyToSend]
        );
        assert!(!session.is_reviewing());
    }

    #[test]
    fn outcome_slugs_round_trip() {
        for outcome in ReviewOutcome::ALL {
            assert_eq!(ReviewOutcome::from_slug(outcome.slug()), Some(outcome));
            assert_eq!(outcome.status().label(), outcome.label());
        }
        assert_eq!(ReviewOutcome::from_slug("sent"), None);
    }
}
