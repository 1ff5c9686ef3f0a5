// Copyright 2025 The NoteQ Authors
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

use serde::Deserialize;
use serde::Serialize;

use crate::types::letter::Letter;

/// One answer given by the user, keyed by the question's topic id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAnswer {
    #[serde(rename = "topicId")]
    pub topic_id: i64,
    pub selected: Letter,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let answer = UserAnswer {
            topic_id: 12,
            selected: Letter::C,
        };
        let json = serde_json::to_string(&answer).unwrap();
        assert_eq!(json, r#"{"topicId":12,"selected":"C"}"#);
    }
}
