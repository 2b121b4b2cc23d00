pub mod add;
pub mod create;
pub mod open;
pub mod split;

use crate::error::Result;

pub use add::AddCommand;
pub use create::CreateCommand;
pub use open::OpenCommand;
pub use split::SplitCommand;

#[async_trait::async_trait]
pub trait Command {
    async fn execute(&self) -> Result<()>;
}

/// Run blocking engine work off the async runtime.
pub(crate) async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> lucy::Result<T> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(f).await??)
}
