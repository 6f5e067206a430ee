#[cfg(test)]
mod tests {
    use crate::tools::artifact::TranslatorArtifact;

    #[test]
    fn test_writes_script_and_deletes_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = TranslatorArtifact::create(dir.path(), "function doWeb() {}").unwrap();
        let path = artifact.path().to_path_buf();

        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("translator-") && name.ends_with(".js"), "{name}");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "function doWeb() {}");

        drop(artifact);
        assert!(!path.exists());
    }

    #[test]
    fn test_release_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = TranslatorArtifact::create(dir.path(), "x").unwrap();
        let path = artifact.release().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("translators").join("tmp");
        let artifact = TranslatorArtifact::create(&nested, "x").unwrap();
        assert!(artifact.path().starts_with(&nested));
    }

    #[test]
    fn test_each_artifact_gets_its_own_file() {
        let dir = tempfile::tempdir().unwrap();
        let a = TranslatorArtifact::create(dir.path(), "a").unwrap();
        let b = TranslatorArtifact::create(dir.path(), "b").unwrap();
        assert_ne!(a.path(), b.path());
    }
}
