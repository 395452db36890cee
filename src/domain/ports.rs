use crate::domain::model::{Margins, Viewport};
use crate::utils::error::Result;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn films_endpoint(&self) -> &str;
    fn starships_endpoint(&self) -> &str;
    fn output_path(&self) -> &str;
    fn page_size(&self) -> usize;
    fn request_timeout(&self) -> Option<Duration>;
    fn viewport(&self) -> Viewport;
    fn margins(&self) -> Margins;
    /// Episode ids or film resource URLs to activate before projecting.
    fn selected_films(&self) -> &[String];
    fn output_formats(&self) -> &[String];
}
