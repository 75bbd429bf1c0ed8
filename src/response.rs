use serde::Serialize;

/// Result of a successful user action together with the message shown for it.
#[derive(Debug, Serialize)]
pub struct ActionResponse<T> {
    pub message: String,
    pub data: T,
}

impl<T> ActionResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data,
        }
    }

    pub fn into_data(self) -> T {
        self.data
    }
}
