use serde::{Deserialize, Serialize};

/// What the agent is being asked to do. Sent explicitly so the agent does
/// not have to guess from the prompt text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Draw,
    Chat,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Draw => "draw",
            Action::Chat => "chat",
        }
    }
}

/// One call to the agent runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Correlates this call with earlier ones in the agent's memory.
    pub session_id: String,
    pub actor_id: String,
    pub prompt: String,
    pub action: Action,
}

impl Invocation {
    pub fn payload(&self) -> InvocationPayload<'_> {
        InvocationPayload {
            prompt: &self.prompt,
            session_id: &self.session_id,
            actor_id: &self.actor_id,
            action: self.action,
        }
    }
}

/// JSON body of `POST /invocations`.
#[derive(Debug, Serialize)]
pub struct InvocationPayload<'a> {
    pub prompt: &'a str,
    pub session_id: &'a str,
    pub actor_id: &'a str,
    pub action: Action,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_uses_snake_case_fields() {
        let inv = Invocation {
            session_id: "s1".into(),
            actor_id: "web_user".into(),
            prompt: "おみくじを引いてください".into(),
            action: Action::Draw,
        };
        let json = serde_json::to_value(inv.payload()).unwrap();
        assert_eq!(json["session_id"], "s1");
        assert_eq!(json["actor_id"], "web_user");
        assert_eq!(json["action"], "draw");
        assert_eq!(json["prompt"], "おみくじを引いてください");
    }
}
