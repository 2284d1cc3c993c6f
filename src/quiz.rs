use crate::accent::category_pattern;
use crate::catalog::{DEITIES, Deity};
use crate::sequencer::Sequencer;

const OPTIONS: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub prompt: String,
    pub options: Vec<&'static str>,
    pub answer: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Wrong { answer: usize },
    TimedOut { answer: usize },
}

/// Deity-epithet questions, reproducible for a given seed.
pub fn deity_questions(seed: u32, count: usize) -> Vec<Question> {
    let n = DEITIES.len();
    let picks = category_pattern(seed, count * OPTIONS, n);

    (0..count)
        .map(|q| {
            let subject = &DEITIES[(seed as usize + q * 7) % n];
            let mut options: Vec<&'static str> = vec![subject.name];
            for &p in &picks[q * OPTIONS..(q + 1) * OPTIONS] {
                if options.len() == OPTIONS {
                    break;
                }
                push_distractor(&mut options, &DEITIES[p]);
            }
            // Fill deterministically if the hash repeated itself
            let mut k = 1;
            while options.len() < OPTIONS.min(n) {
                push_distractor(&mut options, &DEITIES[(seed as usize + q * 7 + k) % n]);
                k += 1;
            }

            let answer = picks[q * OPTIONS] % options.len();
            options.swap(0, answer);
            Question {
                prompt: format!("Which deity is called {}, lord of {}?", subject.epithet, subject.domain),
                options,
                answer,
            }
        })
        .collect()
}

fn push_distractor(options: &mut Vec<&'static str>, deity: &Deity) {
    if !options.contains(&deity.name) {
        options.push(deity.name);
    }
}

pub struct Quiz {
    questions: Vec<Question>,
    index: usize,
    score: usize,
    outcomes: Vec<Outcome>,
    seconds_per_question: u32,
}

impl Quiz {
    pub fn new(questions: Vec<Question>, seconds_per_question: u32) -> Self {
        Self {
            questions,
            index: 0,
            score: 0,
            outcomes: Vec::new(),
            seconds_per_question,
        }
    }

    pub fn current(&self) -> Option<&Question> {
        self.questions.get(self.index)
    }

    /// Fresh countdown for the current question, if one is running.
    pub fn timer(&self) -> Option<Sequencer<u32>> {
        self.current()?;
        Sequencer::countdown(self.seconds_per_question).ok()
    }

    pub fn answer(&mut self, choice: usize) -> Option<Outcome> {
        let q = self.current()?;
        let outcome = if choice == q.answer {
            self.score += 1;
            Outcome::Correct
        } else {
            Outcome::Wrong { answer: q.answer }
        };
        self.record(outcome);
        Some(outcome)
    }

    pub fn time_out(&mut self) -> Option<Outcome> {
        let outcome = Outcome::TimedOut {
            answer: self.current()?.answer,
        };
        self.record(outcome);
        Some(outcome)
    }

    fn record(&mut self, outcome: Outcome) {
        self.outcomes.push(outcome);
        self.index += 1;
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.index >= self.questions.len()
    }

    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Quiz {
    /// Wait for `choice` while the countdown runs.
    ///
    /// A choice of `None` (input closed) or an expired timer records a
    /// timeout. The timer task is released before this returns.
    pub async fn answer_within<F, E>(&mut self, choice: F) -> Result<Option<Outcome>, E>
    where
        F: Future<Output = Result<Option<usize>, E>>,
    {
        if self.current().is_none() {
            return Ok(None);
        }
        let picked = match self.timer() {
            Some(timer) => {
                let mut handle = crate::sequencer::Playback::start(timer);
                tokio::select! {
                    c = choice => c?,
                    _ = handle.finished() => None,
                }
            }
            None => choice.await?,
        };
        Ok(match picked {
            Some(c) => self.answer(c),
            None => self.time_out(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_questions_are_reproducible() {
        assert_eq!(deity_questions(10_101, 5), deity_questions(10_101, 5));
    }

    #[test]
    fn test_question_shape() {
        for q in deity_questions(36_210, 10) {
            assert_eq!(q.options.len(), OPTIONS);
            assert!(q.answer < OPTIONS);
            let mut unique = q.options.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), OPTIONS);
            let subject = DEITIES.iter().find(|d| d.name == q.options[q.answer]).unwrap();
            assert!(q.prompt.contains(subject.epithet));
        }
    }

    #[test]
    fn test_quiz_flow() {
        let questions = deity_questions(1, 3);
        let answers: Vec<usize> = questions.iter().map(|q| q.answer).collect();
        let mut quiz = Quiz::new(questions, 15);

        assert_eq!(quiz.timer().unwrap().len(), 15);
        assert_eq!(quiz.answer(answers[0]), Some(Outcome::Correct));
        let wrong = (answers[1] + 1) % OPTIONS;
        assert_eq!(quiz.answer(wrong), Some(Outcome::Wrong { answer: answers[1] }));
        assert_eq!(quiz.time_out(), Some(Outcome::TimedOut { answer: answers[2] }));

        assert!(quiz.is_complete());
        assert_eq!(quiz.score(), 1);
        assert_eq!(quiz.outcomes().len(), 3);
        assert_eq!(quiz.answer(0), None);
        assert!(quiz.timer().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_expires_unanswered_question() {
        let questions = deity_questions(7, 2);
        let answers: Vec<usize> = questions.iter().map(|q| q.answer).collect();
        let mut quiz = Quiz::new(questions, 15);

        let start = tokio::time::Instant::now();
        let outcome = quiz
            .answer_within(std::future::pending::<Result<Option<usize>, ()>>())
            .await
            .unwrap();
        assert_eq!(outcome, Some(Outcome::TimedOut { answer: answers[0] }));
        let waited = start.elapsed();
        assert!(waited >= std::time::Duration::from_secs(15), "timed out after {:?}", waited);

        let outcome = quiz
            .answer_within(async { Ok::<_, ()>(Some(answers[1])) })
            .await
            .unwrap();
        assert_eq!(outcome, Some(Outcome::Correct));
        assert_eq!(start.elapsed(), waited);
        assert_eq!(quiz.score(), 1);
        assert!(quiz.is_complete());
    }

    #[tokio::test(start_paused = true)]
    async fn test_answer_after_delay_within_countdown() {
        let questions = deity_questions(3, 1);
        let answer = questions[0].answer;
        let mut quiz = Quiz::new(questions, 15);
        let outcome = quiz
            .answer_within(async {
                tokio::time::sleep(std::time::Duration::from_secs(10)).await;
                Ok::<_, ()>(Some(answer))
            })
            .await
            .unwrap();
        assert_eq!(outcome, Some(Outcome::Correct));
    }

    #[tokio::test]
    async fn test_closed_input_times_out_and_errors_propagate() {
        let mut quiz = Quiz::new(deity_questions(5, 2), 15);
        let outcome = quiz.answer_within(async { Ok::<_, ()>(None) }).await.unwrap();
        assert!(matches!(outcome, Some(Outcome::TimedOut { .. })));
        assert_eq!(quiz.answer_within(async { Err("read failed") }).await, Err("read failed"));
        assert_eq!(quiz.outcomes().len(), 1);
    }
}
