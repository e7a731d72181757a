pub mod github;

pub use github::GithubReleases;
