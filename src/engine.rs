//! Render engine
//!
//!     [Engine] ties the pipeline together: every render builds a fresh lexer and parser for
//!     its source and hands the tree to a shared [Dumper]. The dumper keeps no per-render
//!     state, so one engine can serve any number of renders.
//!
//! Caching
//!
//!     With a cache directory configured, [Engine::cache] compiles a template file to
//!     `<dir>/<name>.php`, where `<name>` is the file name without its `.slim` extension. A
//!     cached file newer than its template is reused as is.

use crate::config::SlimConfig;
use crate::dumping::Dumper;
use crate::error::{Error, Result};
use crate::extensions::{AutotagsVisitor, TextFilter, Visitor};
use crate::options::Options;
use crate::parsing::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info};

/// Source name reported for templates rendered from a string.
pub const INPUT_SOURCE_NAME: &str = "input";

#[derive(Debug)]
pub struct Engine {
    dumper: Dumper,
    cache_dir: Option<PathBuf>,
}

impl Engine {
    /// Engine without any extension registered.
    pub fn new(options: Options) -> Self {
        Self {
            dumper: Dumper::new(options),
            cache_dir: None,
        }
    }

    /// Engine with the autotags visitor and the built-in filters registered.
    pub fn with_defaults(options: Options) -> Result<Self> {
        let mut engine = Self::new(options);
        engine.register_visitor("tag", AutotagsVisitor)?;
        engine.dumper.register_builtin_filters()?;
        Ok(engine)
    }

    pub fn from_config(config: &SlimConfig) -> Result<Self> {
        let mut engine = Self::new(config.options());
        if config.extensions.autotags {
            engine.register_visitor("tag", AutotagsVisitor)?;
        }
        if config.extensions.builtin_filters {
            engine.dumper.register_builtin_filters()?;
        }
        engine.cache_dir = config.cache.directory.clone();
        Ok(engine)
    }

    pub fn options(&self) -> Options {
        self.dumper.options()
    }

    pub fn register_visitor(&mut self, kind: &str, visitor: impl Visitor + 'static) -> Result<()> {
        Ok(self.dumper.register_visitor(kind, visitor)?)
    }

    pub fn register_filter(
        &mut self,
        alias: &str,
        filter: impl TextFilter + 'static,
    ) -> Result<()> {
        Ok(self.dumper.register_filter(alias, filter)?)
    }

    /// Renders template source held in memory.
    pub fn render_str(&self, source: &str) -> Result<String> {
        self.render(source, INPUT_SOURCE_NAME)
    }

    /// Renders a template file. Errors name the file path.
    pub fn render_file(&self, path: impl AsRef<Path>) -> Result<String> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::NotAFile(path.to_path_buf()));
        }
        let source = fs::read_to_string(path).map_err(|error| Error::io(path, error))?;
        self.render(&source, &path.display().to_string())
    }

    /// Compiles a template file into the cache directory and returns the compiled file's path.
    pub fn cache(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = path.as_ref();
        let dir = match &self.cache_dir {
            Some(dir) if dir.is_dir() => dir,
            _ => return Err(Error::CacheUnavailable),
        };
        let cached = dir.join(format!("{}.php", cache_key(path)?));

        if is_fresh(path, &cached) {
            debug!(path = %cached.display(), "cache hit");
            return Ok(cached);
        }

        let writable = fs::metadata(dir)
            .map(|metadata| !metadata.permissions().readonly())
            .unwrap_or(false);
        if !writable {
            return Err(Error::CacheNotWritable(dir.clone()));
        }

        let rendered = self.render_file(path)?;
        fs::write(&cached, rendered).map_err(|error| Error::io(&cached, error))?;
        info!(template = %path.display(), path = %cached.display(), "template cached");
        Ok(cached)
    }

    fn render(&self, source: &str, source_name: &str) -> Result<String> {
        debug!(source = source_name, "rendering");
        let root = Parser::from_source(source, self.options())
            .parse()
            .map_err(|error| Error::from_parse(error, source_name))?;
        Ok(self.dumper.dump(root)?)
    }
}

/// File name of a template without its `.slim` extension.
fn cache_key(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(Error::NotAFile(path.to_path_buf()));
    }
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(name.strip_suffix(".slim").unwrap_or(&name).to_string())
}

fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path)
        .and_then(|metadata| metadata.modified())
        .ok()
}

/// Whether the cached file exists and is strictly newer than its template.
fn is_fresh(template: &Path, cached: &Path) -> bool {
    match (modified(template), modified(cached)) {
        (Some(template), Some(cached)) => template < cached,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn renders_strings() {
        let engine = Engine::with_defaults(Options::default()).unwrap();
        assert_eq!(
            engine.render_str("input:checkbox(name=\"a\")").unwrap(),
            r#"<input name="a" type="checkbox" />"#
        );
    }

    #[test]
    fn bare_engine_has_no_extensions() {
        let engine = Engine::new(Options::default());
        assert_eq!(engine.render_str("a:void").unwrap(), "<a:void></a:void>");
        assert!(engine.render_str(":style\n  a {}").is_err());
    }

    #[test]
    fn cache_key_drops_slim_extension() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("index.html.slim");
        fs::write(&template, "p").unwrap();
        assert_eq!(cache_key(&template).unwrap(), "index.html");
        assert!(matches!(cache_key(dir.path()), Err(Error::NotAFile(_))));
    }

    #[test]
    fn freshness_compares_modification_times() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("a.slim");
        let cached = dir.path().join("a.php");
        fs::write(&template, "p").unwrap();
        assert!(!is_fresh(&template, &cached));

        fs::write(&cached, "<p></p>").unwrap();
        let older = SystemTime::now() - Duration::from_secs(60);
        fs::File::options()
            .write(true)
            .open(&template)
            .unwrap()
            .set_modified(older)
            .unwrap();
        assert!(is_fresh(&template, &cached));
    }

    fn engine_caching_into(dir: &Path) -> Engine {
        let mut engine = Engine::new(Options::default());
        engine.cache_dir = Some(dir.to_path_buf());
        engine
    }

    fn set_modified(path: &Path, time: SystemTime) {
        fs::File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(time)
            .unwrap();
    }

    #[test]
    fn fresh_cache_entry_is_reused() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("page.slim");
        fs::write(&template, "p one").unwrap();
        set_modified(&template, SystemTime::now() - Duration::from_secs(60));
        let engine = engine_caching_into(dir.path());

        let cached = engine.cache(&template).unwrap();
        assert_eq!(cached, dir.path().join("page.php"));
        assert_eq!(fs::read_to_string(&cached).unwrap(), "<p>one</p>");

        fs::write(&cached, "kept").unwrap();
        assert_eq!(engine.cache(&template).unwrap(), cached);
        assert_eq!(fs::read_to_string(&cached).unwrap(), "kept");
    }

    #[test]
    fn stale_cache_entry_is_recompiled() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("page.slim");
        let cached = dir.path().join("page.php");
        fs::write(&cached, "old").unwrap();
        fs::write(&template, "p two").unwrap();
        set_modified(&template, SystemTime::now() + Duration::from_secs(60));

        let engine = engine_caching_into(dir.path());
        assert_eq!(engine.cache(&template).unwrap(), cached);
        assert_eq!(fs::read_to_string(&cached).unwrap(), "<p>two</p>");
    }

    #[test]
    fn cache_needs_an_existing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("page.slim");
        fs::write(&template, "p").unwrap();

        let engine = Engine::new(Options::default());
        assert!(matches!(
            engine.cache(&template),
            Err(Error::CacheUnavailable)
        ));

        let engine = engine_caching_into(&dir.path().join("missing"));
        assert!(matches!(
            engine.cache(&template),
            Err(Error::CacheUnavailable)
        ));
    }

    #[test]
    fn read_only_cache_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("cache");
        fs::create_dir(&cache).unwrap();
        let template = dir.path().join("page.slim");
        fs::write(&template, "p").unwrap();

        let mut permissions = fs::metadata(&cache).unwrap().permissions();
        permissions.set_readonly(true);
        fs::set_permissions(&cache, permissions.clone()).unwrap();

        let result = engine_caching_into(&cache).cache(&template);

        permissions.set_readonly(false);
        fs::set_permissions(&cache, permissions).unwrap();

        match result {
            Err(Error::CacheNotWritable(path)) => assert_eq!(path, cache),
            other => panic!("expected CacheNotWritable, got {other:?}"),
        }
        assert!(!cache.join("page.php").exists());
    }
}
