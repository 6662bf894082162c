use serde::{Deserialize, Serialize};

/// An `m.room.message` event body. Exactly these two fields go on the wire;
/// the server fills in everything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub msgtype: String,
    pub body: String,
}

impl Message {
    /// A plain `m.text` message.
    pub fn text(body: impl Into<String>) -> Self {
        Self::new("m.text", body)
    }

    pub fn new(msgtype: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            msgtype: msgtype.into(),
            body: body.into(),
        }
    }
}
