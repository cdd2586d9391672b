//! Navigation hand-off at the end of a run.

/// Receives the final navigation of a completed run.
///
/// Called exactly once per run that reaches `Terminated`, after the
/// container has been torn down. Closures taking `&str` implement it.
pub trait Navigator: Send + Sync {
    /// Navigate to `destination`.
    fn navigate(&self, destination: &str);
}

impl<F> Navigator for F
where
    F: Fn(&str) + Send + Sync,
{
    fn navigate(&self, destination: &str) {
        self(destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_closure_navigator() {
        let visited = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&visited);
        let navigator = move |destination: &str| sink.lock().unwrap().push(destination.to_string());

        let navigator: &dyn Navigator = &navigator;
        navigator.navigate("/home");

        assert_eq!(*visited.lock().unwrap(), vec!["/home".to_string()]);
    }
}
