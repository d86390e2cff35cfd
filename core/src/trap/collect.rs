// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::Error;
use crate::trap::Trap;

/// A trap that keeps the rendered errors in memory.
///
/// Clones share the same storage, so a clone can be handed to a logger while the original is
/// kept for inspection.
///
/// # Examples
///
/// ```
/// use logsmith_core::Error;
/// use logsmith_core::Trap;
/// use logsmith_core::trap::CollectTrap;
///
/// let trap = CollectTrap::default();
/// trap.clone().trap(&Error::new("disk full"));
/// assert_eq!(trap.messages(), vec!["disk full".to_string()]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct CollectTrap {
    messages: Arc<Mutex<Vec<String>>>,
}

impl CollectTrap {
    /// Return a snapshot of all trapped errors, rendered with `Display`.
    pub fn messages(&self) -> Vec<String> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.messages.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Trap for CollectTrap {
    fn trap(&self, err: &Error) {
        self.lock().push(err.to_string());
    }
}
