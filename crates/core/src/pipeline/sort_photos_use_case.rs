use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::time::Instant;

use thiserror::Error;

use crate::embedding::domain::embedding_extractor::EmbeddingExtractor;
use crate::library::domain::frame_decoder::FrameDecoder;
use crate::library::domain::photo_filter::{label_for, select_photos};
use crate::library::domain::photo_placer::PhotoPlacer;
use crate::library::domain::photo_scanner::PhotoScanner;
use crate::matching::domain::identity_matcher::IdentityMatcher;
use crate::matching::domain::sort_report::SortReport;
use crate::pipeline::photo_fault::{embed_photo, PhotoFault};
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::registry::domain::registry::Registry;
use crate::registry::domain::registry_store::{RegistryLoadError, RegistryStore};
use crate::shared::constants::UNMATCHED_DIR_NAME;

#[derive(Error, Debug)]
pub enum SortError {
    #[error("cannot prepare output directory {path}: {source}")]
    OutputSetup { path: PathBuf, source: io::Error },
    #[error("output directory {output} would erase {input}; choose a separate output directory")]
    OutputContainsInput { output: PathBuf, input: PathBuf },
    #[error(transparent)]
    RegistryLoad(#[from] RegistryLoadError),
    #[error("cannot list group photos in {path}: {source}")]
    Scan { path: PathBuf, source: io::Error },
}

/// A photo that was classified and copied everywhere it belongs.
#[derive(Debug)]
pub struct PhotoOutcome {
    pub matches: usize,
    pub unmatched: bool,
    pub written: Vec<PathBuf>,
}

/// Locations involved in one sorting run.
#[derive(Clone, Copy, Debug)]
pub struct SortPaths<'p> {
    pub reference_dir: &'p Path,
    pub group_dir: &'p Path,
    pub output_dir: &'p Path,
    pub artifact: &'p Path,
}

/// Sorts group photos into per-identity folders:
/// reset output → load registry → (scan → decode → extract → match → copy).
///
/// Without a registry every photo is copied unsorted into the output root.
/// One photo's fault is logged and counted; it never stops the batch.
pub struct SortPhotosUseCase<'a> {
    scanner: &'a dyn PhotoScanner,
    placer: &'a mut dyn PhotoPlacer,
    decoder: &'a dyn FrameDecoder,
    extractor: &'a mut dyn EmbeddingExtractor,
    store: &'a dyn RegistryStore,
    matcher: IdentityMatcher,
}

impl<'a> SortPhotosUseCase<'a> {
    pub fn new(
        scanner: &'a dyn PhotoScanner,
        placer: &'a mut dyn PhotoPlacer,
        decoder: &'a dyn FrameDecoder,
        extractor: &'a mut dyn EmbeddingExtractor,
        store: &'a dyn RegistryStore,
        matcher: IdentityMatcher,
    ) -> Self {
        Self {
            scanner,
            placer,
            decoder,
            extractor,
            store,
            matcher,
        }
    }

    pub fn execute(
        &mut self,
        paths: SortPaths<'_>,
        logger: &mut dyn PipelineLogger,
    ) -> Result<SortReport, SortError> {
        check_output_is_separate(&paths)?;
        self.placer
            .reset(paths.output_dir)
            .map_err(|source| SortError::OutputSetup {
                path: paths.output_dir.to_path_buf(),
                source,
            })?;

        let registry = self.store.load(paths.artifact)?;

        let photos = match self.scanner.list(paths.group_dir) {
            Ok(listing) => select_photos(listing),
            Err(source) => {
                return Err(SortError::Scan {
                    path: paths.group_dir.to_path_buf(),
                    source,
                })
            }
        };

        let report = match registry {
            None => {
                logger.warning(&format!(
                    "No registry at {}, copying {} photos unsorted",
                    paths.artifact.display(),
                    photos.len()
                ));
                self.copy_unsorted(&photos, paths.output_dir, logger)
            }
            Some(registry) => {
                self.warn_if_stale(&registry, paths.reference_dir, logger);
                self.sort_all(&photos, &registry, paths.output_dir, logger)
            }
        };

        logger.info(&format!(
            "Sorted {} photos: {} matches, {} unmatched, {} skipped, {} failed",
            report.processed, report.matched, report.unmatched, report.skipped, report.failed
        ));
        Ok(report)
    }

    fn copy_unsorted(
        &mut self,
        photos: &[PathBuf],
        output_dir: &Path,
        logger: &mut dyn PipelineLogger,
    ) -> SortReport {
        let mut report = SortReport::default();
        for (i, path) in photos.iter().enumerate() {
            logger.progress(i + 1, photos.len());
            match self.placer.place(path, output_dir) {
                Ok(dest) => {
                    report.processed += 1;
                    report.output_files.push(dest);
                }
                Err(e) => {
                    logger.warning(&format!(
                        "cannot copy {} into {}: {e}",
                        path.display(),
                        output_dir.display()
                    ));
                    report.failed += 1;
                }
            }
        }
        report
    }

    fn sort_all(
        &mut self,
        photos: &[PathBuf],
        registry: &Registry,
        output_dir: &Path,
        logger: &mut dyn PipelineLogger,
    ) -> SortReport {
        let mut report = SortReport::default();
        for (i, path) in photos.iter().enumerate() {
            logger.progress(i + 1, photos.len());
            match self.sort_photo(path, registry, output_dir, logger) {
                Ok(outcome) => {
                    report.processed += 1;
                    report.matched += outcome.matches;
                    if outcome.unmatched {
                        report.unmatched += 1;
                    }
                    report.output_files.extend(outcome.written);
                }
                Err(PhotoFault::Place {
                    path,
                    dest_dir,
                    source,
                    written,
                }) => {
                    logger.warning(&format!(
                        "cannot copy {} into {}: {source}",
                        path.display(),
                        dest_dir.display()
                    ));
                    report.failed += 1;
                    report.output_files.extend(written);
                }
                Err(fault) => {
                    logger.warning(&format!("{fault}, skipping"));
                    report.skipped += 1;
                }
            }
        }
        report
    }

    fn sort_photo(
        &mut self,
        path: &Path,
        registry: &Registry,
        output_dir: &Path,
        logger: &mut dyn PipelineLogger,
    ) -> Result<PhotoOutcome, PhotoFault> {
        let faces = embed_photo(
            self.scanner,
            self.decoder,
            &mut *self.extractor,
            path,
            logger,
        )?;
        let result = self
            .matcher
            .classify(&faces, registry, self.extractor.metric());

        let destinations: Vec<(PathBuf, bool)> = if result.is_unmatched() {
            vec![(output_dir.join(UNMATCHED_DIR_NAME), true)]
        } else {
            result
                .labels
                .iter()
                .map(|label| (output_dir.join(label), is_plain_folder_name(label)))
                .collect()
        };

        let t0 = Instant::now();
        let mut written = Vec::with_capacity(destinations.len());
        for (dest_dir, allowed) in destinations {
            let placed = if allowed {
                self.placer.place(path, &dest_dir)
            } else {
                Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "label is reserved or not a plain folder name",
                ))
            };
            match placed {
                Ok(dest) => written.push(dest),
                Err(source) => {
                    return Err(PhotoFault::Place {
                        path: path.to_path_buf(),
                        dest_dir,
                        source,
                        written,
                    })
                }
            }
        }
        logger.timing("place", t0.elapsed().as_secs_f64() * 1000.0);

        Ok(PhotoOutcome {
            matches: result.matches,
            unmatched: result.is_unmatched(),
            written,
        })
    }

    /// Warn when the registry was built from a different set of reference
    /// photos than the ones on disk now.
    fn warn_if_stale(
        &self,
        registry: &Registry,
        reference_dir: &Path,
        logger: &mut dyn PipelineLogger,
    ) {
        let on_disk: BTreeSet<String> = match self.scanner.list(reference_dir) {
            Ok(listing) => select_photos(listing)
                .iter()
                .filter_map(|p| label_for(p))
                .collect(),
            Err(_) => BTreeSet::new(),
        };
        let registered: BTreeSet<String> = registry.labels().iter().cloned().collect();

        let gone: Vec<&String> = registered.difference(&on_disk).collect();
        let new: Vec<&String> = on_disk.difference(&registered).collect();
        if !gone.is_empty() || !new.is_empty() {
            logger.warning(&format!(
                "Registry may be stale relative to {}: registered but missing {gone:?}, \
                 present but unregistered {new:?}",
                reference_dir.display()
            ));
        }
    }
}

/// A label loaded from disk must name a single folder directly under the
/// output directory, other than the unmatched folder.
fn is_plain_folder_name(label: &str) -> bool {
    let mut components = Path::new(label).components();
    label != UNMATCHED_DIR_NAME
        && matches!(components.next(), Some(Component::Normal(_)))
        && components.next().is_none()
}

/// The output directory is emptied before sorting, so it must not hold
/// the group photos, the reference photos or the registry.
fn check_output_is_separate(paths: &SortPaths<'_>) -> Result<(), SortError> {
    let output = resolve(paths.output_dir);
    for input in [paths.group_dir, paths.reference_dir, paths.artifact] {
        if resolve(input).starts_with(&output) {
            return Err(SortError::OutputContainsInput {
                output: paths.output_dir.to_path_buf(),
                input: input.to_path_buf(),
            });
        }
    }
    Ok(())
}

/// Absolute form of `path` with its longest existing prefix canonicalised,
/// so symlinks and relative spellings of the same directory compare equal.
fn resolve(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_path_buf(),
        }
    };

    let mut existing = absolute.as_path();
    let mut missing = Vec::new();
    loop {
        if let Ok(canonical) = fs::canonicalize(existing) {
            return missing
                .iter()
                .rev()
                .fold(canonical, |acc: PathBuf, part| acc.join(part));
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => return absolute,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::infrastructure::image_frame_decoder::ImageFrameDecoder;
    use crate::library::infrastructure::memory_photo_library::MemoryPhotoLibrary;
    use crate::pipeline::pipeline_logger::{NullPipelineLogger, RecordingPipelineLogger};
    use crate::pipeline::register_faces_use_case::RegisterFacesUseCase;
    use crate::registry::infrastructure::memory_registry_store::MemoryRegistryStore;
    use crate::testing::{solid_png, ColorKeyExtractor};

    const ALICE: [u8; 3] = [220, 20, 20];
    const BOB: [u8; 3] = [20, 220, 20];
    const ALICE_AND_BOB: [u8; 3] = [220, 220, 20];
    const STRANGER: [u8; 3] = [20, 20, 220];
    const NO_FACE: [u8; 3] = [128, 128, 128];
    const BROKEN: [u8; 3] = [1, 1, 1];

    struct Fixture {
        library: MemoryPhotoLibrary,
        store: MemoryRegistryStore,
        extractor: ColorKeyExtractor,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                library: MemoryPhotoLibrary::new(),
                store: MemoryRegistryStore::new(),
                extractor: ColorKeyExtractor::new()
                    .with_faces(ALICE, vec![vec![1.0, 0.0, 0.0]])
                    .with_faces(BOB, vec![vec![0.0, 1.0, 0.0]])
                    .with_faces(ALICE_AND_BOB, vec![vec![0.95, 0.05, 0.0], vec![0.0, 0.9, 0.1]])
                    .with_faces(STRANGER, vec![vec![0.0, 0.0, 1.0]])
                    .failing_on(BROKEN),
            }
        }

        fn reference(&self, name: &str, color: [u8; 3]) {
            self.library
                .insert(Path::new("/refs").join(name), solid_png(color));
        }

        fn group(&self, name: &str, color: [u8; 3]) {
            self.library
                .insert(Path::new("/group").join(name), solid_png(color));
        }

        fn register(&mut self) {
            let decoder = ImageFrameDecoder::new();
            RegisterFacesUseCase::new(&self.library, &decoder, &mut self.extractor, &self.store)
                .execute(
                    Path::new("/refs"),
                    Path::new("/state/encodings.json"),
                    &mut NullPipelineLogger,
                )
                .unwrap();
        }

        fn sort_with(&mut self, logger: &mut dyn PipelineLogger) -> Result<SortReport, SortError> {
            let decoder = ImageFrameDecoder::new();
            let mut placer = self.library.clone();
            SortPhotosUseCase::new(
                &self.library,
                &mut placer,
                &decoder,
                &mut self.extractor,
                &self.store,
                IdentityMatcher::default(),
            )
            .execute(
                SortPaths {
                    reference_dir: Path::new("/refs"),
                    group_dir: Path::new("/group"),
                    output_dir: Path::new("/out"),
                    artifact: Path::new("/state/encodings.json"),
                },
                logger,
            )
        }

        fn sort(&mut self) -> Result<SortReport, SortError> {
            self.sort_with(&mut NullPipelineLogger)
        }

        fn output(&self) -> Vec<PathBuf> {
            self.library.files_under(Path::new("/out"))
        }
    }

    fn paths(items: &[&str]) -> Vec<PathBuf> {
        items.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_alice_party_example() {
        let mut fx = Fixture::new();
        fx.reference("alice.jpg", ALICE);
        fx.reference("bob.jpg", NO_FACE);
        fx.group("party1.jpg", ALICE);
        fx.group("party2.jpg", NO_FACE);
        fx.register();

        let report = fx.sort().unwrap();

        assert_eq!(report.processed, 2);
        assert_eq!(report.matched, 1);
        assert_eq!(report.unmatched, 1);
        assert_eq!(report.skipped, 0);
        assert_eq!(
            fx.output(),
            paths(&["/out/alice/party1.jpg", "/out/unmatched/party2.jpg"])
        );
        assert_eq!(
            fx.library.read_file(Path::new("/out/alice/party1.jpg")),
            fx.library.read_file(Path::new("/group/party1.jpg"))
        );
    }

    #[test]
    fn test_photo_with_two_identities_lands_in_both_folders() {
        let mut fx = Fixture::new();
        fx.reference("alice.jpg", ALICE);
        fx.reference("bob.jpg", BOB);
        fx.group("together.jpg", ALICE_AND_BOB);
        fx.register();

        let report = fx.sort().unwrap();

        assert_eq!(report.processed, 1);
        assert_eq!(report.matched, 2);
        assert_eq!(report.unmatched, 0);
        assert_eq!(
            fx.output(),
            paths(&["/out/alice/together.jpg", "/out/bob/together.jpg"])
        );
    }

    #[test]
    fn test_faces_without_match_go_to_unmatched() {
        let mut fx = Fixture::new();
        fx.reference("alice.jpg", ALICE);
        fx.group("crowd.png", STRANGER);
        fx.register();

        let report = fx.sort().unwrap();
        assert_eq!((report.processed, report.matched, report.unmatched), (1, 0, 1));
        assert_eq!(fx.output(), paths(&["/out/unmatched/crowd.png"]));
    }

    #[test]
    fn test_duplicate_label_copies_once() {
        let mut fx = Fixture::new();
        fx.reference("alice.jpg", ALICE);
        fx.reference("alice.png", ALICE);
        fx.group("party.jpg", ALICE);
        fx.register();

        let report = fx.sort().unwrap();
        assert_eq!(report.matched, 2);
        assert_eq!(report.output_files, paths(&["/out/alice/party.jpg"]));
    }

    #[test]
    fn test_sort_twice_is_idempotent() {
        let mut fx = Fixture::new();
        fx.reference("alice.jpg", ALICE);
        fx.reference("bob.jpg", BOB);
        fx.group("a.jpg", ALICE);
        fx.group("b.jpg", ALICE_AND_BOB);
        fx.group("c.jpg", NO_FACE);
        fx.register();

        let first = fx.sort().unwrap();
        let first_files = fx.output();
        let second = fx.sort().unwrap();

        assert_eq!(first, second);
        assert_eq!(first_files, fx.output());
    }

    #[test]
    fn test_output_is_reset_before_sorting() {
        let mut fx = Fixture::new();
        fx.reference("alice.jpg", ALICE);
        fx.group("a.jpg", ALICE);
        fx.library.insert("/out/old/leftover.jpg", "old");
        fx.register();

        fx.sort().unwrap();
        assert_eq!(fx.output(), paths(&["/out/alice/a.jpg"]));
    }

    #[test]
    fn test_missing_registry_copies_everything_unsorted() {
        let mut fx = Fixture::new();
        fx.group("b.jpg", ALICE);
        fx.group("a.png", NO_FACE);
        fx.group("corrupt.jpg", BROKEN);
        fx.group("notes.txt", ALICE);
        let mut logger = RecordingPipelineLogger::default();

        let report = fx.sort_with(&mut logger).unwrap();

        assert_eq!((report.processed, report.matched, report.unmatched), (3, 0, 0));
        assert_eq!(
            report.output_files,
            paths(&["/out/a.png", "/out/b.jpg", "/out/corrupt.jpg"])
        );
        assert!(logger.warnings[0].contains("No registry"));
    }

    #[test]
    fn test_zero_length_registry_is_no_match_mode() {
        let mut fx = Fixture::new();
        fx.store.put_raw("/state/encodings.json", "");
        fx.group("a.jpg", ALICE);

        let report = fx.sort().unwrap();
        assert_eq!(report.output_files, paths(&["/out/a.jpg"]));
    }

    #[test]
    fn test_empty_registry_sorts_everything_unmatched() {
        let mut fx = Fixture::new();
        fx.group("a.jpg", ALICE);
        fx.register();

        let report = fx.sort().unwrap();
        assert_eq!((report.processed, report.unmatched), (1, 1));
        assert_eq!(fx.output(), paths(&["/out/unmatched/a.jpg"]));
    }

    #[test]
    fn test_corrupt_registry_is_error_and_writes_nothing() {
        let mut fx = Fixture::new();
        fx.store.put_raw("/state/encodings.json", "\u{80}garbage");
        fx.group("a.jpg", ALICE);
        fx.library.insert("/out/old.jpg", "old");

        let err = fx.sort().unwrap_err();
        assert!(matches!(err, SortError::RegistryLoad(_)));
        assert!(fx.output().is_empty());
    }

    #[test]
    fn test_unequal_registry_sequences_are_error() {
        let mut fx = Fixture::new();
        fx.store
            .put_raw("/state/encodings.json", r#"[[[1.0, 0.0, 0.0]], []]"#);
        fx.group("a.jpg", ALICE);

        assert!(matches!(fx.sort(), Err(SortError::RegistryLoad(_))));
    }

    #[test]
    fn test_unreadable_photo_is_skipped_not_counted() {
        let mut fx = Fixture::new();
        fx.reference("alice.jpg", ALICE);
        fx.group("a.jpg", ALICE);
        fx.group("corrupt.jpg", NO_FACE);
        fx.library.insert("/group/corrupt.jpg", "not an image");
        fx.group("crash.jpg", BROKEN);
        fx.register();
        let mut logger = RecordingPipelineLogger::default();

        let report = fx.sort_with(&mut logger).unwrap();

        assert_eq!(report.processed, 1);
        assert_eq!(report.unmatched, 0);
        assert_eq!(report.skipped, 2);
        assert_eq!(fx.output(), paths(&["/out/alice/a.jpg"]));
        assert!(logger.warnings.iter().any(|w| w.contains("corrupt.jpg")));
        assert!(logger.warnings.iter().any(|w| w.contains("crash.jpg")));
    }

    #[test]
    fn test_failed_copy_does_not_stop_batch() {
        let mut fx = Fixture::new();
        fx.reference("alice.jpg", ALICE);
        fx.reference("bob.jpg", BOB);
        fx.group("a.jpg", ALICE_AND_BOB);
        fx.group("b.jpg", BOB);
        fx.group("c.jpg", NO_FACE);
        fx.register();
        fx.library.deny_writes("/out/bob");

        let report = fx.sort().unwrap();

        assert_eq!(report.failed, 2);
        assert_eq!(report.processed, 1);
        assert_eq!(report.unmatched, 1);
        assert_eq!(
            report.output_files,
            paths(&["/out/alice/a.jpg", "/out/unmatched/c.jpg"])
        );
    }

    #[test]
    fn test_missing_group_dir_is_error() {
        let mut fx = Fixture::new();
        fx.reference("alice.jpg", ALICE);
        fx.register();
        assert!(matches!(fx.sort(), Err(SortError::Scan { .. })));
    }

    #[test]
    fn test_stale_registry_warns_but_sorts() {
        let mut fx = Fixture::new();
        fx.reference("alice.jpg", ALICE);
        fx.group("a.jpg", ALICE);
        fx.register();
        fx.reference("carol.jpg", BOB);
        let mut logger = RecordingPipelineLogger::default();

        let report = fx.sort_with(&mut logger).unwrap();
        assert_eq!(report.processed, 1);
        assert!(logger
            .warnings
            .iter()
            .any(|w| w.contains("stale") && w.contains("carol")));
    }

    #[test]
    fn test_fresh_registry_does_not_warn() {
        let mut fx = Fixture::new();
        fx.reference("alice.jpg", ALICE);
        fx.group("a.jpg", ALICE);
        fx.register();
        let mut logger = RecordingPipelineLogger::default();

        fx.sort_with(&mut logger).unwrap();
        assert!(logger.warnings.is_empty());
    }

    #[test]
    fn test_label_escaping_output_dir_is_refused() {
        let mut fx = Fixture::new();
        fx.store.put_raw(
            "/state/encodings.json",
            r#"[[[1.0, 0.0, 0.0]], ["../escape"]]"#,
        );
        fx.group("a.jpg", ALICE);

        let report = fx.sort().unwrap();
        assert_eq!(report.failed, 1);
        assert!(fx.library.files_under(Path::new("/escape")).is_empty());
    }

    #[test]
    fn test_reserved_label_in_artifact_is_refused() {
        let mut fx = Fixture::new();
        fx.store.put_raw(
            "/state/encodings.json",
            r#"[[[1.0, 0.0, 0.0]], ["unmatched"]]"#,
        );
        fx.group("a.jpg", ALICE);

        let report = fx.sort().unwrap();
        assert_eq!((report.matched, report.unmatched, report.failed), (0, 0, 1));
        assert!(fx.output().is_empty());
    }

    fn sort_into(
        fx: &mut Fixture,
        group_dir: &str,
        output_dir: &str,
        artifact: &str,
    ) -> Result<SortReport, SortError> {
        let decoder = ImageFrameDecoder::new();
        let mut placer = fx.library.clone();
        SortPhotosUseCase::new(
            &fx.library,
            &mut placer,
            &decoder,
            &mut fx.extractor,
            &fx.store,
            IdentityMatcher::default(),
        )
        .execute(
            SortPaths {
                reference_dir: Path::new("/refs"),
                group_dir: Path::new(group_dir),
                output_dir: Path::new(output_dir),
                artifact: Path::new(artifact),
            },
            &mut NullPipelineLogger,
        )
    }

    #[rstest::rstest]
    #[case::same_as_group("/photos", "/photos", "/state/encodings.json")]
    #[case::parent_of_group("/photos/group", "/photos", "/state/encodings.json")]
    #[case::same_as_references("/group", "/refs", "/state/encodings.json")]
    #[case::holds_registry("/group", "/state", "/state/encodings.json")]
    fn test_output_overlapping_inputs_is_refused_untouched(
        #[case] group_dir: &str,
        #[case] output_dir: &str,
        #[case] artifact: &str,
    ) {
        let mut fx = Fixture::new();
        fx.library
            .insert(Path::new(group_dir).join("party1.jpg"), solid_png(ALICE));
        fx.store.put_raw(artifact, r#"[[[1.0, 0.0, 0.0]], ["alice"]]"#);
        let before = fx.library.files_under(Path::new("/"));

        let err = sort_into(&mut fx, group_dir, output_dir, artifact).unwrap_err();

        assert!(matches!(err, SortError::OutputContainsInput { .. }));
        assert_eq!(fx.library.files_under(Path::new("/")), before);
        assert!(fx.store.raw(Path::new(artifact)).is_some());
    }

    #[test]
    fn test_output_inside_group_dir_is_allowed() {
        let mut fx = Fixture::new();
        fx.reference("alice.jpg", ALICE);
        fx.register();
        fx.group("party1.jpg", ALICE);

        let report =
            sort_into(&mut fx, "/group", "/group/sorted", "/state/encodings.json").unwrap();
        assert_eq!(report.matched, 1);
        assert!(fx.library.exists(Path::new("/group/party1.jpg")));
        assert!(fx.library.exists(Path::new("/group/sorted/alice/party1.jpg")));
    }

    #[test]
    fn test_empty_group_dir_sorts_nothing() {
        let mut fx = Fixture::new();
        fx.reference("alice.jpg", ALICE);
        fx.register();
        fx.library.create_dir("/group");

        let report = fx.sort().unwrap();
        assert_eq!(report.processed, 0);
        assert!(fx.output().is_empty());
    }

    #[rstest::rstest]
    #[case("alice", true)]
    #[case("../etc", false)]
    #[case("a/b", false)]
    #[case("/abs", false)]
    #[case("", false)]
    #[case("unmatched", false)]
    fn test_is_plain_folder_name(#[case] label: &str, #[case] expected: bool) {
        assert_eq!(is_plain_folder_name(label), expected);
    }

    #[test]
    fn test_resolve_keeps_missing_tail() {
        let tmp = tempfile::tempdir().unwrap();
        let base = fs::canonicalize(tmp.path()).unwrap();
        assert_eq!(
            resolve(&tmp.path().join("out").join("group")),
            base.join("out").join("group")
        );
    }
}
