use webpage::{PageProperties, merge_options};

use super::read_options;
use crate::cli::SettingsArgs;
use crate::error::Result;

/// Default page properties with the config file deep-merged over them.
pub fn run(args: &SettingsArgs) -> Result<PageProperties> {
	let overrides = read_options(args.config.as_deref())?;
	Ok(merge_options(&PageProperties::default(), &overrides)?)
}

#[cfg(test)]
mod tests {
	use std::io::Write;

	use super::*;
	use crate::error::CliError;

	fn config(contents: &str) -> tempfile::NamedTempFile {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		file.write_all(contents.as_bytes()).unwrap();
		file
	}

	#[test]
	fn defaults_without_config() {
		let props = run(&SettingsArgs { config: None }).unwrap();
		assert_eq!(props, PageProperties::default());
	}

	#[test]
	fn config_merges_nested_settings() {
		let file = config(r#"{ "settings": { "loadImages": false }, "viewportSize": { "width": 1024 } }"#);
		let props = run(&SettingsArgs {
			config: Some(file.path().to_path_buf()),
		})
		.unwrap();

		assert!(!props.settings.load_images);
		assert!(props.settings.javascript_enabled);
		assert_eq!(props.viewport_size.width, 1024);
		assert_eq!(props.viewport_size.height, 300);
	}

	#[test]
	fn malformed_config() {
		let file = config("{ not json");
		let err = run(&SettingsArgs {
			config: Some(file.path().to_path_buf()),
		})
		.unwrap_err();
		assert!(matches!(err, CliError::ConfigParse { .. }));
	}

	#[test]
	fn wrong_option_type() {
		let file = config(r#"{ "zoomFactor": "big" }"#);
		let err = run(&SettingsArgs {
			config: Some(file.path().to_path_buf()),
		})
		.unwrap_err();
		assert!(matches!(err, CliError::Page(e) if e.is_usage()));
	}
}
