// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scripted `QueryRunner` for tests. Rules match on a substring of the script;
// unmatched scripts return empty output, which the directories read as
// "no results".

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use leisedruck_core::error::Result;

use crate::runner::QueryRunner;

struct Rule {
    needle: String,
    responses: VecDeque<Result<String>>,
}

#[derive(Default)]
struct Inner {
    rules: Mutex<Vec<Rule>>,
    calls: Mutex<Vec<String>>,
}

/// Fake runner that replays canned responses.
#[derive(Clone, Default)]
pub struct ScriptedRunner {
    inner: Arc<Inner>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for any script containing `needle`. Repeated calls
    /// with the same needle queue further responses; once the queue is empty
    /// the runner answers with empty output.
    pub fn on(self, needle: &str, response: Result<String>) -> Self {
        {
            let mut rules = self.inner.rules.lock().expect("rules lock poisoned");
            if let Some(rule) = rules.iter_mut().find(|r| r.needle == needle) {
                rule.responses.push_back(response);
            } else {
                rules.push(Rule {
                    needle: needle.to_owned(),
                    responses: VecDeque::from([response]),
                });
            }
        }
        self
    }

    /// Every script that was run, in order.
    pub fn calls(&self) -> Vec<String> {
        self.inner.calls.lock().expect("calls lock poisoned").clone()
    }
}

impl QueryRunner for ScriptedRunner {
    async fn run_query(&self, script: &str) -> Result<String> {
        self.inner
            .calls
            .lock()
            .expect("calls lock poisoned")
            .push(script.to_owned());

        let mut rules = self.inner.rules.lock().expect("rules lock poisoned");
        for rule in rules.iter_mut() {
            if script.contains(&rule.needle) {
                if let Some(response) = rule.responses.pop_front() {
                    return response;
                }
            }
        }
        Ok(String::new())
    }
}
