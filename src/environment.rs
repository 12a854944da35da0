//! Global environments set up once before all suites and torn down once
//! after them.

/// Set-up/tear-down pair wrapped around an entire run
///
/// Any error returned from a hook aborts the run with a non-zero exit code.
pub trait Environment {
    fn set_up(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    fn tear_down(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    /// Name used in logs
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Environment built from two closures
pub struct FnEnvironment<S, T> {
    name: String,
    set_up: S,
    tear_down: T,
}

impl<S, T> FnEnvironment<S, T>
where
    S: FnMut() -> anyhow::Result<()>,
    T: FnMut() -> anyhow::Result<()>,
{
    pub fn new<N: Into<String>>(name: N, set_up: S, tear_down: T) -> Self {
        Self {
            name: name.into(),
            set_up,
            tear_down,
        }
    }
}

impl<S, T> Environment for FnEnvironment<S, T>
where
    S: FnMut() -> anyhow::Result<()>,
    T: FnMut() -> anyhow::Result<()>,
{
    fn set_up(&mut self) -> anyhow::Result<()> {
        (self.set_up)()
    }

    fn tear_down(&mut self) -> anyhow::Result<()> {
        (self.tear_down)()
    }

    fn name(&self) -> &str {
        &self.name
    }
}
