#[cfg(feature = "calamine")]
pub mod calamine;

#[cfg(feature = "calamine")]
pub use calamine::CalamineGrid;

#[cfg(feature = "umya")]
pub mod umya;

#[cfg(feature = "umya")]
pub use umya::UmyaGrid;
