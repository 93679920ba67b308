//! Инфраструктурный слой вокруг движка матча:
//! - порты внешних систем (сток/источник событий, снимки, заявки, номера);
//! - in-memory реализации для тестов, dev-CLI и локального запуска.

pub mod persistence;

pub use persistence::*;
