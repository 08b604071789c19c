//! Tests for site configuration application

use mkimg_conf::{ConfigManager, Error, ErrorKind, SectionKind, SiteConf, defaults};
use mkimg_test_utils::TestSite;
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::path::PathBuf;

#[test]
fn test_missing_path_is_noop() {
    let mut config = ConfigManager::new();
    config.set_siteconf(None).unwrap();
    assert_eq!(config, ConfigManager::new());
}

#[test]
fn test_missing_file_is_config_error() {
    let site = TestSite::new();
    let mut config = ConfigManager::new();

    let err = config
        .set_siteconf(Some(site.path("absent.conf").as_path()))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Config);
    assert!(err.to_string().contains("absent.conf"));
    assert_eq!(config, ConfigManager::new());
}

#[test]
fn test_malformed_file_leaves_store_alone() {
    let site = TestSite::new();
    let good = site.write_file("good.conf", "[create]\ntmpdir = /good\n");
    let bad = site.write_file("bad.conf", "tmpdir = /orphan\n");

    let mut config = ConfigManager::new();
    config.set_siteconf(Some(good.as_path())).unwrap();
    let before = config.clone();

    let err = config.set_siteconf(Some(bad.as_path())).unwrap_err();
    assert!(matches!(err, Error::SiteConfParse { .. }));
    assert_eq!(config, before);
}

#[test]
fn test_common_only_propagates_everywhere() {
    let site = TestSite::new();
    let path = site.write_siteconf("[common]\ndistro_name = Tizen\nlogfile = /var/log/mkimg.log\n");

    let mut config = ConfigManager::new();
    config.set_siteconf(Some(path.as_path())).unwrap();

    for kind in SectionKind::ALL {
        assert_eq!(config.get_str(kind, "distro_name"), Some("Tizen"), "{kind}");
        assert_eq!(
            config.get_str(kind, "logfile"),
            Some("/var/log/mkimg.log"),
            "{kind}"
        );
    }
    assert_eq!(config.siteconf(), Some(path.as_path()));
}

#[test]
fn test_explicit_section_options_survive_common() {
    let site = TestSite::new();
    let path = site.write_siteconf(
        "[common]\ndistro_name = Tizen\n\n[chroot]\ndistro_name = Chroot Distro\n",
    );

    let mut config = ConfigManager::new();
    config.set_siteconf(Some(path.as_path())).unwrap();

    assert_eq!(config.get_str(SectionKind::Chroot, "distro_name"), Some("Chroot Distro"));
    assert_eq!(config.get_str(SectionKind::Create, "distro_name"), Some("Tizen"));
    assert_eq!(config.get_str(SectionKind::Convert, "distro_name"), Some("Tizen"));
}

#[test]
fn test_default_section_does_not_shadow_common() {
    let site = TestSite::new();
    let path = site.write_siteconf(
        "[DEFAULT]\nlogfile = /from/default\n\n[common]\nlogfile = /from/common\n\n[create]\ntmpdir = /t\n",
    );

    let mut config = ConfigManager::new();
    config.set_siteconf(Some(path.as_path())).unwrap();

    assert_eq!(config.get_str(SectionKind::Create, "logfile"), Some("/from/common"));
    assert_eq!(config.get_str(SectionKind::Chroot, "logfile"), Some("/from/common"));
    assert_eq!(config.get_str(SectionKind::Create, "tmpdir"), Some("/t"));
}

#[test]
fn test_untouched_defaults_remain() {
    let site = TestSite::new();
    let path = site.write_siteconf("[create]\ntmpdir = /srv/tmp\n");

    let mut config = ConfigManager::new();
    config.set_siteconf(Some(path.as_path())).unwrap();

    assert_eq!(config.get_str(SectionKind::Create, "tmpdir"), Some("/srv/tmp"));
    assert_eq!(
        config.get(SectionKind::Create, "cachedir"),
        defaults::value(SectionKind::Create, "cachedir").as_ref()
    );
    assert_eq!(config.get(SectionKind::Create, "arch"), Some(&Value::Null));
    assert_eq!(
        config.get(SectionKind::Create, "record_pkgs"),
        Some(&Value::Array(vec![]))
    );
}

#[test]
fn test_unknown_sections_and_options_are_tolerated() {
    let site = TestSite::new();
    let path = site.write_siteconf("[create]\nfrobnicate = yes\n\n[mystery]\nkey = value\n");

    let mut config = ConfigManager::new();
    config.set_siteconf(Some(path.as_path())).unwrap();

    assert_eq!(config.get_str(SectionKind::Create, "frobnicate"), Some("yes"));
    assert!(config.to_json().get("mystery").is_none());
}

#[test]
fn test_bootstrap_groups_from_file() {
    let site = TestSite::new();
    let path = site.write_siteconf(
        "\
[bootstrap1]
repoa_baseurl = http://x
repoa_priority = 1

[bootstrap_tizen]
name = tizen
main = https://download.example/tizen
note = not a url

[bootstrap_more]
name = tizen
extra_baseurl = ftp://mirror/extra
",
    );

    let mut config = ConfigManager::new();
    config.set_siteconf(Some(path.as_path())).unwrap();

    let bootstraps = config.bootstraps();
    assert_eq!(bootstraps.keys().collect::<Vec<_>>(), vec!["bootstrap1", "tizen"]);
    assert_eq!(
        bootstraps["bootstrap1"].repo("repoa").unwrap().encoded(),
        "baseurl:http://x,priority:1,"
    );
    assert_eq!(
        bootstraps["tizen"].repostrs(),
        vec![
            "name:main,baseurl:https://download.example/tizen,".to_string(),
            "name:extra,baseurl:ftp://mirror/extra,".to_string(),
        ]
    );
}

#[test]
fn test_fresh_stores_agree() {
    let site = TestSite::new();
    let path = site.write_siteconf(
        "[common]\ndistro_name = A\n\n[create]\nproxy = http://p:1\n\n[bootstrap]\nr_baseurl = file:///r\n",
    );
    let loaded = SiteConf::load(&path).unwrap();

    let mut first = ConfigManager::new();
    first.apply_siteconf(&loaded);
    let mut second = ConfigManager::new();
    second.apply_siteconf(&loaded);
    assert_eq!(first, second);

    first.apply_siteconf(&loaded);
    assert_eq!(first, second);
}

#[test]
fn test_second_siteconf_replaces_first() {
    let site = TestSite::new();
    let a = site.write_file("a.conf", "[create]\ntmpdir = /a\n\n[bootstrap_a]\nx = http://a\n");
    let b = site.write_file("b.conf", "[create]\ncachedir = /b\n");

    let mut config = ConfigManager::new();
    config.set_siteconf(Some(a.as_path())).unwrap();
    config.set_siteconf(Some(b.as_path())).unwrap();

    assert_eq!(config.get_str(SectionKind::Create, "tmpdir"), Some("/var/tmp/mkimg"));
    assert_eq!(config.get_str(SectionKind::Create, "cachedir"), Some("/b"));
    assert!(config.bootstraps().is_empty());
}

#[test]
fn test_interpolation_and_default_section() {
    let site = TestSite::new();
    let path = site.write_siteconf(
        "\
[DEFAULT]
base = /srv/mkimg

[create]
tmpdir = %(base)s/tmp
cachedir = %(base)s/cache
",
    );

    let mut config = ConfigManager::new();
    config.set_siteconf(Some(path.as_path())).unwrap();

    assert_eq!(config.get_str(SectionKind::Create, "tmpdir"), Some("/srv/mkimg/tmp"));
    assert_eq!(config.cachedir(), PathBuf::from("/srv/mkimg/cache"));
}
