use super::{ShareSet, DISABLED_SKELETON};
use crate::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const CONFIG: &str = "\"InstallConfigStore\"\n{\n\t\"Software\"\n\t{\n\t\t\"Valve\" \"1\"\n\t}\n\t\"AuthorizedDevice\"\n\t{\n\t\t\"111\"\n\t\t{\n\t\t\t\"timeused\"\t\t\"1500000000\"\n\t\t}\n\t\t\"222\"\n\t\t{\n\t\t\t\"timeused\"\t\t\"1600000000\"\n\t\t}\n\t}\n\t// trailing comment\n}\n";

const DISABLED: &str = "\"InstallConfigStore\"\n{\n\t\"AuthorizedDevice\"\n\t{\n\t\t\"333\"\n\t\t{\n\t\t\t\"timeused\"\t\t\"1400000000\"\n\t\t}\n\t}\n}\n";

fn entry(id: &str, time: &str) -> String {
    format!("\t\t\"{id}\"\n\t\t{{\n\t\t\t\"timeused\"\t\t\"{time}\"\n\t\t}}\n")
}

fn setup(disabled: Option<&str>) -> (TempDir, PathBuf, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.vdf");
    let off = dir.path().join("sfs-disabled.vdf");
    fs::write(&config, CONFIG).unwrap();
    if let Some(text) = disabled {
        fs::write(&off, text).unwrap();
    }
    (dir, config, off)
}

fn ids(set: &ShareSet) -> Vec<(&str, bool)> {
    set.shares()
        .iter()
        .map(|s| (s.id.as_str(), s.enabled))
        .collect()
}

#[test]
fn test_load_merges_both_lists() {
    let (_dir, config, off) = setup(Some(DISABLED));
    let set = ShareSet::load(&config, &off).unwrap();
    assert_eq!(ids(&set), vec![("111", true), ("222", true), ("333", false)]);
    assert_eq!(set.shares()[1].time_used, 1_600_000_000);
    assert_eq!(set.shares()[2].raw().len(), 4);
}

#[test]
fn test_missing_companion_file_is_created() {
    let (_dir, config, off) = setup(None);
    let set = ShareSet::load(&config, &off).unwrap();
    assert_eq!(fs::read_to_string(&off).unwrap(), DISABLED_SKELETON);
    assert_eq!(set.shares().len(), 2);
}

#[test]
fn test_unchanged_write_is_byte_identical() {
    let (_dir, config, off) = setup(Some(DISABLED));
    ShareSet::load(&config, &off).unwrap().write().unwrap();
    assert_eq!(fs::read_to_string(&config).unwrap(), CONFIG);
    assert_eq!(fs::read_to_string(&off).unwrap(), DISABLED);
}

#[test]
fn test_disable_moves_lines_between_files() {
    let (_dir, config, off) = setup(Some(DISABLED));
    let mut set = ShareSet::load(&config, &off).unwrap();
    set.disable(&["111"]).unwrap();
    set.enable(&["333"]).unwrap();
    set.write().unwrap();

    let expected_config = CONFIG.replace(
        &entry("111", "1500000000"),
        "",
    )
    .replace(
        &entry("222", "1600000000"),
        &format!("{}{}", entry("222", "1600000000"), entry("333", "1400000000")),
    );
    assert_eq!(fs::read_to_string(&config).unwrap(), expected_config);
    assert!(fs::read_to_string(&config).unwrap().contains("// trailing comment"));

    let expected_off = DISABLED.replace(&entry("333", "1400000000"), &entry("111", "1500000000"));
    assert_eq!(fs::read_to_string(&off).unwrap(), expected_off);

    let reloaded = ShareSet::load(&config, &off).unwrap();
    assert_eq!(ids(&reloaded), vec![("222", true), ("333", true), ("111", false)]);
}

#[test]
fn test_prioritize_reorders_config() {
    let (_dir, config, off) = setup(Some(DISABLED));
    let mut set = ShareSet::load(&config, &off).unwrap();
    set.set_all(true);
    set.prioritize(&["333"], &["111"]).unwrap();
    assert_eq!(ids(&set), vec![("333", true), ("222", true), ("111", true)]);
    set.write().unwrap();

    let text = fs::read_to_string(&config).unwrap();
    let p333 = text.find("\"333\"").unwrap();
    let p222 = text.find("\"222\"").unwrap();
    let p111 = text.find("\"111\"").unwrap();
    assert!(p333 < p222 && p222 < p111);
    assert_eq!(fs::read_to_string(&off).unwrap(), DISABLED_SKELETON);
}

#[test]
fn test_unknown_share_changes_nothing() {
    let (_dir, config, off) = setup(Some(DISABLED));
    let mut set = ShareSet::load(&config, &off).unwrap();
    let err = set.disable(&["111", "999"]).unwrap_err();
    assert!(matches!(err, Error::UnknownShare(ref id) if id == "999"));
    assert!(set.shares()[0].enabled);

    let err = set.prioritize(&["222"], &["nope"]).unwrap_err();
    assert!(matches!(err, Error::UnknownShare(_)));
    assert_eq!(set.shares()[0].id, "111");
}

#[test]
fn test_missing_device_section_is_reported() {
    let (_dir, config, off) = setup(Some("\"InstallConfigStore\"\n{\n}\n"));
    let err = ShareSet::load(&config, &off).err().unwrap();
    assert!(matches!(err, Error::MissingSection(_)), "got {err:?}");
}

fn localconfig(userdata: &Path, id: &str, licenses: &str) {
    let dir = userdata.join(id).join("config");
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("localconfig.vdf"),
        format!("\"UserLocalConfigStore\"\n{{\n\t\"Licenses\"\n\t{{\n{licenses}\t}}\n}}\n"),
    )
    .unwrap();
}

#[test]
fn test_licenses_follow_priority_order() {
    let (dir, config, off) = setup(Some(DISABLED));
    let userdata = dir.path().join("userdata");
    localconfig(&userdata, "111", "\t\t\"5\"\n\t\t{\n\t\t}\n\t\t\"6\"\t\"x\"\n");
    localconfig(&userdata, "333", "\t\t\"6\"\n\t\t{\n\t\t}\n\t\t\"notanid\"\t\"y\"\n");
    // 222 has no userdata directory at all
    let path_for = |id: &str| userdata.join(id).join("config").join("localconfig.vdf");

    let mut set = ShareSet::load(&config, &off).unwrap();
    let owners = set.licenses(path_for);
    assert_eq!(owners.len(), 2);
    assert_eq!(owners[&5], vec!["111"]);
    assert_eq!(owners[&6], vec!["111", "333"]);

    set.prioritize(&["333"], &[]).unwrap();
    assert_eq!(set.licenses(path_for)[&6], vec!["333", "111"]);
}

#[test]
fn test_broken_local_config_owns_nothing() {
    let (dir, config, off) = setup(Some(DISABLED));
    let userdata = dir.path().join("userdata");
    localconfig(&userdata, "222", "\t\t\"7\"\t\"x\"\n");
    let broken = userdata.join("111").join("config");
    fs::create_dir_all(&broken).unwrap();
    fs::write(broken.join("localconfig.vdf"), "\"UserLocalConfigStore\"\n{\n").unwrap();

    let set = ShareSet::load(&config, &off).unwrap();
    let owners = set.licenses(|id| userdata.join(id).join("config").join("localconfig.vdf"));
    assert_eq!(owners.keys().copied().collect::<Vec<_>>(), vec![7]);
    assert_eq!(owners[&7], vec!["222"]);
}
