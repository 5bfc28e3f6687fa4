//! Decision session state machine

use super::{
    evaluate, question, Answer, DecisionContext, Outcome, Question, Transition, FIRST_STEP,
    TOTAL_STEPS,
};
use crate::{CoreError, CoreResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// One caller's walk through the decision tree.
///
/// The session is a plain value owned by the caller; every transition takes it
/// by `&mut` and nothing is kept anywhere else. Serialized sessions are
/// rebuilt by replaying their responses, so a tampered snapshot cannot put the
/// session into a state the tree could not have reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SessionSnapshot")]
pub struct DecisionSession {
    current_step: u8,
    responses: BTreeMap<u8, Answer>,
    #[serde(flatten)]
    context: DecisionContext,
    is_complete: bool,
}

#[derive(Deserialize)]
struct SessionSnapshot {
    current_step: u8,
    #[serde(default)]
    responses: BTreeMap<u8, Answer>,
}

impl TryFrom<SessionSnapshot> for DecisionSession {
    type Error = CoreError;

    fn try_from(snapshot: SessionSnapshot) -> CoreResult<Self> {
        let mut session = DecisionSession::start();

        for (expected, (&step, &answer)) in (FIRST_STEP..).zip(&snapshot.responses) {
            if step != expected {
                return Err(CoreError::Config(format!(
                    "Responses must be contiguous from step {}; found step {}",
                    FIRST_STEP, step
                )));
            }
            if session.is_complete {
                return Err(CoreError::Config(format!(
                    "Response at step {} follows a terminal answer",
                    step
                )));
            }
            session.submit(answer)?;
        }

        // A session that stepped back keeps the response of the step it
        // returned to, so it sits one step behind the replayed position.
        let stepped_back = !session.is_complete
            && snapshot.current_step >= FIRST_STEP
            && snapshot.current_step.checked_add(1) == Some(session.current_step);

        if stepped_back {
            session.current_step = snapshot.current_step;
        } else if snapshot.current_step != session.current_step {
            return Err(CoreError::Config(format!(
                "Current step {} does not match recorded responses",
                snapshot.current_step
            )));
        }

        Ok(session)
    }
}

impl DecisionSession {
    /// New session at step 1 with no responses
    pub fn start() -> Self {
        Self {
            current_step: FIRST_STEP,
            responses: BTreeMap::new(),
            context: DecisionContext::default(),
            is_complete: false,
        }
    }

    /// Drive a fresh session through `answers` in order
    pub fn replay<S: AsRef<str>>(answers: &[S]) -> CoreResult<(Self, Option<Outcome>)> {
        let mut session = Self::start();
        let mut outcome = None;

        for answer in answers {
            outcome = session.submit_answer(answer.as_ref())?.outcome();
        }

        Ok((session, outcome))
    }

    /// Submit a raw answer token for the current step
    pub fn submit_answer(&mut self, token: &str) -> CoreResult<Transition> {
        if self.is_complete {
            return Err(CoreError::SessionComplete);
        }

        let answer = token
            .parse::<Answer>()
            .map_err(|_| CoreError::InvalidAnswerToken {
                step: self.current_step,
                answer: token.to_string(),
            })?;

        self.submit(answer)
    }

    /// Submit a parsed answer for the current step
    pub fn submit(&mut self, answer: Answer) -> CoreResult<Transition> {
        if self.is_complete {
            return Err(CoreError::SessionComplete);
        }

        let step = self.current_step;
        if !question(step).is_some_and(|q| q.accepts(answer)) {
            return Err(CoreError::InvalidAnswerToken {
                step,
                answer: answer.token().to_string(),
            });
        }

        self.responses.insert(step, answer);

        match evaluate(step, answer, &mut self.context) {
            Some(outcome) => {
                self.is_complete = true;
                tracing::debug!("Decision tree completed at step {}: {}", step, outcome);
                Ok(Transition::Outcome { outcome })
            }
            None => {
                self.current_step += 1;
                Ok(Transition::Continue {
                    next_step: self.current_step,
                })
            }
        }
    }

    /// Return to the previous step, discarding the response ahead of it.
    /// Does nothing at step 1.
    pub fn step_back(&mut self) {
        if self.current_step <= FIRST_STEP {
            return;
        }

        self.current_step -= 1;
        self.responses.remove(&(self.current_step + 1));
        self.is_complete = false;

        let mut context = DecisionContext::default();
        for (&step, &answer) in &self.responses {
            evaluate(step, answer, &mut context);
        }
        self.context = context;
    }

    /// Reset to a fresh session
    pub fn restart(&mut self) {
        *self = Self::start();
    }

    /// Re-run the table over the recorded responses in step order
    pub fn recompute_outcome(&self) -> Option<Outcome> {
        let mut context = DecisionContext::default();

        (FIRST_STEP..=TOTAL_STEPS)
            .filter_map(|step| self.responses.get(&step).map(|&answer| (step, answer)))
            .find_map(|(step, answer)| evaluate(step, answer, &mut context))
    }

    /// Terminal outcome, once the session is complete
    pub fn outcome(&self) -> Option<Outcome> {
        if self.is_complete {
            self.recompute_outcome()
        } else {
            None
        }
    }

    /// Question awaiting an answer, `None` once complete
    pub fn current_question(&self) -> Option<&'static Question> {
        if self.is_complete {
            None
        } else {
            question(self.current_step)
        }
    }

    pub fn progress(&self) -> Progress {
        Progress::new(self.current_step, self.is_complete)
    }

    /// Snapshot of a completed session for download
    pub fn export(&self) -> CoreResult<DecisionExport> {
        if !self.is_complete {
            return Err(CoreError::NotComplete);
        }

        Ok(DecisionExport {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            responses: self.responses.clone(),
            result: self.recompute_outcome(),
        })
    }

    pub fn current_step(&self) -> u8 {
        self.current_step
    }

    pub fn responses(&self) -> &BTreeMap<u8, Answer> {
        &self.responses
    }

    pub fn response(&self, step: u8) -> Option<Answer> {
        self.responses.get(&step).copied()
    }

    pub fn context(&self) -> DecisionContext {
        self.context
    }

    pub fn is_complete(&self) -> bool {
        self.is_complete
    }
}

impl Default for DecisionSession {
    fn default() -> Self {
        Self::start()
    }
}

/// Progress indicator state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub step: u8,
    pub total_steps: u8,
    pub percent: u8,
    pub label: String,
}

impl Progress {
    fn new(step: u8, is_complete: bool) -> Self {
        let label = if is_complete {
            "Complete".to_string()
        } else {
            format!("Step {} of {}", step, TOTAL_STEPS)
        };

        Self {
            step,
            total_steps: TOTAL_STEPS,
            percent: (u32::from(step) * 100 / u32::from(TOTAL_STEPS)) as u8,
            label,
        }
    }
}

/// Exported result of a completed session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionExport {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub responses: BTreeMap<u8, Answer>,
    pub result: Option<Outcome>,
}

impl DecisionExport {
    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Download file name, dated by the export timestamp
    pub fn file_name(&self) -> String {
        format!(
            "poc-decision-tree-result-{}.json",
            self.timestamp.format("%Y-%m-%d")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(answers: &[&str]) -> (DecisionSession, Option<Outcome>) {
        DecisionSession::replay(answers).unwrap()
    }

    /// Every answer sequence that reaches an outcome
    fn all_paths() -> Vec<Vec<Answer>> {
        fn walk(session: DecisionSession, path: Vec<Answer>, out: &mut Vec<Vec<Answer>>) {
            let Some(q) = session.current_question() else {
                out.push(path);
                return;
            };
            for answer in q.valid_answers() {
                let mut next = session.clone();
                next.submit(answer).unwrap();
                let mut next_path = path.clone();
                next_path.push(answer);
                walk(next, next_path, out);
            }
        }

        let mut out = Vec::new();
        walk(DecisionSession::start(), Vec::new(), &mut out);
        out
    }

    #[test]
    fn test_reachability() {
        let cases: &[(&[&str], Outcome)] = &[
            (&["no"], Outcome::GuidedTrial),
            (&["yes", "no"], Outcome::GuidedTrial),
            (&["yes", "yes", "basic"], Outcome::SandboxTrial),
            (&["yes", "yes", "quality"], Outcome::TechnicalValidationTier1To2),
            (&["yes", "yes", "complex", "yes", "exec"], Outcome::ProofOfValue),
            (&["yes", "yes", "complex", "no", "exec"], Outcome::ProofOfValue),
            (&["yes", "yes", "complex", "yes", "committee"], Outcome::CompetitiveBakeoffTier4),
            (&["yes", "yes", "complex", "no", "committee"], Outcome::TechnicalValidationTier3To4),
            (&["yes", "yes", "complex", "yes", "biz-dev"], Outcome::CompetitiveBakeoffTier3To4),
            (&["yes", "yes", "complex", "no", "biz-dev"], Outcome::TechnicalValidationTier2To3),
        ];

        for (answers, expected) in cases {
            let (session, outcome) = run(answers);
            assert_eq!(outcome, Some(*expected), "answers {:?}", answers);
            assert!(session.is_complete());
            assert_eq!(usize::from(session.current_step()), answers.len());
        }
    }

    #[test]
    fn test_no_poc_unreachable() {
        let paths = all_paths();
        assert_eq!(paths.len(), 10);

        for path in paths {
            let mut session = DecisionSession::start();
            let mut live = None;
            for answer in &path {
                live = session.submit(*answer).unwrap().outcome();
            }
            assert_ne!(live, Some(Outcome::NoPoc));
            assert_eq!(session.recompute_outcome(), live);
        }
    }

    #[test]
    fn test_continue_reports_next_step() {
        let mut session = DecisionSession::start();
        assert_eq!(
            session.submit_answer("yes").unwrap(),
            Transition::Continue { next_step: 2 }
        );
        assert_eq!(session.current_step(), 2);
        assert_eq!(session.recompute_outcome(), None);
        assert_eq!(session.outcome(), None);
    }

    #[test]
    fn test_invalid_token_leaves_state_unchanged() {
        let prefix = ["yes", "yes", "complex", "no"];
        for depth in 0..=prefix.len() {
            let (mut session, _) = run(&prefix[..depth]);
            let before = session.clone();

            let err = session.submit_answer("maybe").unwrap_err();
            assert!(matches!(
                err,
                CoreError::InvalidAnswerToken { step, ref answer }
                    if usize::from(step) == depth + 1 && answer == "maybe"
            ));
            assert_eq!(session, before);
        }
    }

    #[test]
    fn test_token_from_another_step_rejected() {
        let mut session = DecisionSession::start();
        assert!(matches!(
            session.submit_answer("exec"),
            Err(CoreError::InvalidAnswerToken { step: 1, .. })
        ));
        let (mut session, _) = run(&["yes", "yes"]);
        assert!(session.submit_answer("yes").is_err());
        assert_eq!(session.current_step(), 3);
    }

    #[test]
    fn test_complete_session_rejects_answers() {
        let (mut session, _) = run(&["no"]);
        assert!(matches!(
            session.submit_answer("yes"),
            Err(CoreError::SessionComplete)
        ));
        assert!(DecisionSession::replay(&["no", "yes"]).is_err());
    }

    #[test]
    fn test_step_back_restores_prompt() {
        let (mut session, _) = run(&["yes", "yes"]);
        assert_eq!(session.current_step(), 3);

        session.step_back();
        assert_eq!(session.current_step(), 2);
        assert_eq!(session.response(1), Some(Answer::Yes));
        assert_eq!(session.response(2), Some(Answer::Yes));
        assert_eq!(session.response(3), None);
        assert_eq!(session.current_question().map(|q| q.step), Some(2));

        session.step_back();
        assert_eq!(session.current_step(), 1);
        assert_eq!(session.response(2), None);
    }

    #[test]
    fn test_step_back_from_outcome() {
        let (mut session, _) = run(&["yes", "yes", "complex", "yes", "exec"]);
        session.step_back();
        assert!(!session.is_complete());
        assert_eq!(session.current_step(), 4);
        assert_eq!(session.response(5), None);
        assert_eq!(session.context().stakeholder, None);
        assert!(session.context().has_competition);

        assert_eq!(
            session.submit_answer("no").unwrap(),
            Transition::Continue { next_step: 5 }
        );
        assert_eq!(
            session.submit_answer("committee").unwrap().outcome(),
            Some(Outcome::TechnicalValidationTier3To4)
        );
    }

    #[test]
    fn test_step_back_at_first_step_is_noop() {
        let mut session = DecisionSession::start();
        session.step_back();
        assert_eq!(session, DecisionSession::start());

        let (mut session, _) = run(&["no"]);
        session.step_back();
        assert!(session.is_complete());
        assert_eq!(session.outcome(), Some(Outcome::GuidedTrial));
    }

    #[test]
    fn test_restart() {
        let (mut session, _) = run(&["yes", "yes", "basic"]);
        session.restart();
        assert_eq!(session, DecisionSession::start());
    }

    #[test]
    fn test_progress() {
        let mut session = DecisionSession::start();
        assert_eq!(session.progress().label, "Step 1 of 5");
        assert_eq!(session.progress().percent, 20);

        session.submit_answer("yes").unwrap();
        session.submit_answer("yes").unwrap();
        session.submit_answer("quality").unwrap();
        let progress = session.progress();
        assert_eq!(progress.label, "Complete");
        assert_eq!(progress.step, 3);
        assert_eq!(progress.percent, 60);
    }

    #[test]
    fn test_export_requires_completion() {
        let (session, _) = run(&["yes"]);
        assert!(matches!(session.export(), Err(CoreError::NotComplete)));

        let (session, _) = run(&["yes", "yes", "basic"]);
        let export = session.export().unwrap();
        assert_eq!(export.result, Some(Outcome::SandboxTrial));
        assert_eq!(export.responses.len(), 3);
        assert!(export.file_name().starts_with("poc-decision-tree-result-"));

        let json: serde_json::Value = serde_json::from_str(&export.to_json().unwrap()).unwrap();
        assert_eq!(json["result"], "sandbox-trial");
        assert_eq!(json["responses"]["3"], "basic");
    }

    #[test]
    fn test_serialized_session_round_trip() {
        let (mut session, _) = run(&["yes", "yes", "complex"]);
        session.step_back();

        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["current_step"], 3);
        assert_eq!(json["is_complete"], false);
        assert_eq!(json["has_competition"], false);

        let restored: DecisionSession = serde_json::from_value(json).unwrap();
        assert_eq!(restored, session);
    }

    #[test]
    fn test_tampered_snapshots_rejected() {
        let gap = serde_json::json!({"current_step": 3, "responses": {"1": "yes", "3": "basic"}});
        assert!(serde_json::from_value::<DecisionSession>(gap).is_err());

        let past_terminal = serde_json::json!({"current_step": 2, "responses": {"1": "no", "2": "yes"}});
        assert!(serde_json::from_value::<DecisionSession>(past_terminal).is_err());

        let wrong_step = serde_json::json!({"current_step": 5, "responses": {"1": "yes"}});
        assert!(serde_json::from_value::<DecisionSession>(wrong_step).is_err());

        let bad_token = serde_json::json!({"current_step": 2, "responses": {"1": "basic"}});
        assert!(serde_json::from_value::<DecisionSession>(bad_token).is_err());

        for step in [0, u8::MAX] {
            let out_of_range = serde_json::json!({"current_step": step, "responses": {}});
            assert!(serde_json::from_value::<DecisionSession>(out_of_range).is_err());
        }

        let max_after_answers = serde_json::json!({
            "current_step": u8::MAX,
            "responses": {"1": "yes", "2": "yes", "3": "complex", "4": "no"}
        });
        assert!(serde_json::from_value::<DecisionSession>(max_after_answers).is_err());
    }

    #[test]
    fn test_snapshot_derives_context() {
        let json = serde_json::json!({
            "current_step": 5,
            "responses": {"1": "yes", "2": "yes", "3": "complex", "4": "yes"},
            "has_competition": false,
            "is_complete": true
        });
        let session: DecisionSession = serde_json::from_value(json).unwrap();
        assert!(session.context().has_competition);
        assert!(!session.is_complete());
    }
}
