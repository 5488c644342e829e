//! MessagePack implementation of the option repository.
//!
//! Option sets are written with named fields so files stay readable when
//! fields are added.

use std::{fs::File, io::BufWriter, path::Path};

use crate::{Result, error::Error, learning::OptionSet, ports::OptionRepository};

/// MessagePack-based option repository.
///
/// # Examples
///
/// ```no_run
/// use oporto::adapters::MsgPackRepository;
/// use oporto::ports::OptionRepository;
/// use std::path::Path;
///
/// let repo = MsgPackRepository::new();
/// let options = repo.load(Path::new("options.msgpack"))?;
/// println!("{} options", options.options.len());
/// # Ok::<(), oporto::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackRepository;

impl MsgPackRepository {
    pub fn new() -> Self {
        Self
    }
}

impl OptionRepository for MsgPackRepository {
    fn save(&self, options: &OptionSet, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write_named(&mut writer, options).map_err(|e| {
            Error::SerializationContext {
                operation: "serialize option set to MessagePack".to_string(),
                message: e.to_string(),
            }
        })?;

        Ok(())
    }

    fn load(&self, path: &Path) -> Result<OptionSet> {
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open file {path:?}"),
            source,
        })?;

        rmp_serde::decode::from_read(file).map_err(|e| Error::SerializationContext {
            operation: "deserialize option set from MessagePack".to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use rand::{SeedableRng, rngs::StdRng};
    use tempfile::TempDir;

    use super::*;
    use crate::{
        app::LearningConfig,
        envs::FourRoomsEnv,
        learning::{FeatureKind, learn_option},
        types::Xy,
    };

    pub(crate) fn sample_option_set() -> OptionSet {
        let env = FourRoomsEnv::new();
        let config = LearningConfig::new().with_episodes(20).with_alpha(0.5);
        let region = env
            .valid_cells()
            .into_iter()
            .filter(|xy| xy.x < 6 && xy.y <= 6)
            .collect();
        let subgoal = Xy::new(6, 2);
        let mut rng = StdRng::seed_from_u64(4);
        let (option, _) = learn_option(
            &env,
            "east".to_string(),
            region,
            subgoal,
            FeatureKind::Displacement.build(&env, subgoal),
            &config,
            &mut rng,
        )
        .unwrap();
        OptionSet {
            features: FeatureKind::Displacement,
            config,
            options: vec![option],
        }
    }

    #[test]
    fn test_msgpack_roundtrip() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("options.msgpack");

        let repo = MsgPackRepository::new();
        let options = sample_option_set();

        repo.save(&options, &file_path).expect("Failed to save");
        let loaded = repo.load(&file_path).expect("Failed to load");

        assert_eq!(loaded.options.len(), 1);
        assert_eq!(loaded.features, FeatureKind::Displacement);
        assert_eq!(
            loaded.options[0].learner().weights(),
            options.options[0].learner().weights()
        );
        assert_eq!(loaded.options[0].subgoal(), Xy::new(6, 2));
    }

    #[test]
    fn test_load_nonexistent_returns_error() {
        let repo = MsgPackRepository::new();
        let result = repo.load(Path::new("/tmp/nonexistent_oporto_12345.msgpack"));
        assert!(result.is_err());
    }

    #[test]
    fn test_save_to_invalid_path_returns_error() {
        let repo = MsgPackRepository::new();
        let result = repo.save(
            &sample_option_set(),
            Path::new("/invalid_dir_12345/options.msgpack"),
        );
        assert!(result.is_err());
    }
}
