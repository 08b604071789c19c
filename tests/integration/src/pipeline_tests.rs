//! End-to-end tests for the configuration pipeline
//!
//! Site config -> command-line overrides -> kickstart, using the on-disk
//! kickstart reader and the local repository backend.

use mkimg_conf::{Backends, ConfigManager, MacStatus, RepoBackend, SectionKind, SiteConf};
use mkimg_ks::{KickstartFile, LocalRepoBackend};
use mkimg_test_utils::{FakeProbe, TestSite};
use pretty_assertions::assert_eq;

/// A site with an x86 repository, a bootstrap group pointing at it and a
/// kickstart using it
fn setup_site() -> TestSite {
    let site = TestSite::new();
    site.write_rpm_repo(
        "repos/base",
        &[
            "bash-5.2.26-1.x86_64.rpm",
            "glibc-2.38-7.i686.rpm",
            "glibc-2.38-7.x86_64.rpm",
            "rpm-4.19.1-1.x86_64.rpm",
            "tzdata-2024a-1.noarch.rpm",
        ],
    );
    site.write_file(
        "repos/base/comps.json",
        r#"{"core": ["bash", "glibc"], "base": ["rpm"]}"#,
    );
    site.write_rpm_repo("repos/tools", &["qemu-user-8.1-1.x86_64.rpm"]);

    let repo_url = format!("file://{}", site.path("repos/base").display());
    let tools_url = format!("file://{}", site.path("repos/tools").display());
    site.write_siteconf(&format!(
        "\
[DEFAULT]
root = {root}

[common]
distro_name = Test OS

[create]
cachedir = %(root)s/cache
tmpdir = %(root)s/tmp
pkgmgr = zypp
name_prefix = nightly

[bootstrap_test]
name = test
base = {repo_url}
tools_baseurl = {tools_url}
tools_priority = 2
",
        root = site.root().display(),
    ));
    site.write_kickstart(
        "handset.ks",
        &format!(
            "\
lang en_US.UTF-8
part /boot --fstype=ext4 --size=64
part / --fstype=ext4 --size=2048 --label=rootfs
repo --name=base --baseurl={repo_url} --priority=1

%packages
@core
@base
bash
-vim
%end

%post
echo done
%end
"
        ),
    );
    site
}

#[test]
fn test_full_pipeline() {
    let site = setup_site();
    let reader = KickstartFile::new();
    let repos = LocalRepoBackend::new();
    let probe = FakeProbe(MacStatus::Enforcing);
    let backends = Backends {
        reader: &reader,
        repos: &repos,
        probe: &probe,
    };

    let mut config = ConfigManager::new();
    config
        .set_siteconf(Some(site.path("mkimg.conf").as_path()))
        .unwrap();
    config
        .set_ksconf(&site.path("handset.ks"), &backends)
        .unwrap();

    assert_eq!(config.name(), Some("nightly-handset"));
    assert_eq!(config.arch(), Some("x86_64"));
    assert_eq!(config.rpmver(), Some("4.19.1"));
    assert_eq!(config.cachedir(), site.path("cache"));
    assert_eq!(config.get_str(SectionKind::Convert, "distro_name"), Some("Test OS"));

    // zypp cannot read comps, so both groups are expanded into packages
    let ks = config.kickstart().unwrap();
    assert!(ks.packages.groups.is_empty());
    assert_eq!(ks.packages.packages, vec!["bash", "glibc", "rpm"]);
    assert_eq!(ks.packages.excluded, vec!["vim"]);

    site.assert_file_exists("cache/base/packages.json");
}

#[test]
fn test_yum_keeps_native_groups() {
    let site = setup_site();
    let reader = KickstartFile::new();
    let repos = LocalRepoBackend::new();
    let probe = FakeProbe(MacStatus::Disabled);
    let backends = Backends {
        reader: &reader,
        repos: &repos,
        probe: &probe,
    };

    let mut config = ConfigManager::new();
    config
        .set_siteconf(Some(site.path("mkimg.conf").as_path()))
        .unwrap();
    config.set_option(SectionKind::Create, "pkgmgr", "yum");
    config.set_option(SectionKind::Create, "arch", "i686");
    config
        .set_ksconf(&site.path("handset.ks"), &backends)
        .unwrap();

    assert_eq!(config.arch(), Some("i686"));
    assert_eq!(config.kickstart().unwrap().packages.groups, vec!["core", "base"]);
}

#[test]
fn test_bootstrap_repostrs_reach_the_backend() {
    let site = setup_site();
    let loaded = SiteConf::load(site.path("mkimg.conf")).unwrap();
    let group = &loaded.bootstraps()["test"];

    let md = LocalRepoBackend::new()
        .fetch(&group.repostrs(), &site.path("bootstrap-cache"))
        .unwrap();

    let names: Vec<&str> = md.repos.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["base", "tools"]);
    assert_eq!(
        group.repo("tools").unwrap().encoded(),
        format!(
            "baseurl:file://{},priority:2,",
            site.path("repos/tools").display()
        )
    );
    site.assert_file_contains("bootstrap-cache/tools/packages.json", "qemu-user");
}

#[test]
fn test_failed_kickstart_keeps_siteconf_state() {
    let site = setup_site();
    let reader = KickstartFile::new();
    let repos = LocalRepoBackend::new();
    let probe = FakeProbe(MacStatus::Disabled);
    let backends = Backends {
        reader: &reader,
        repos: &repos,
        probe: &probe,
    };

    let mut config = ConfigManager::new();
    config
        .set_siteconf(Some(site.path("mkimg.conf").as_path()))
        .unwrap();
    config.set_option(SectionKind::Create, "arch", "armv7hl");
    let before = config.clone();

    let err = config
        .set_ksconf(&site.path("handset.ks"), &backends)
        .unwrap_err();
    assert!(err.is_config_error());
    assert!(err.to_string().contains("Valid arches: x86_64, i686"));
    assert_eq!(config, before);
}

#[test]
fn test_json_snapshot_of_resolved_store() {
    let site = setup_site();
    let mut config = ConfigManager::new();
    config
        .set_siteconf(Some(site.path("mkimg.conf").as_path()))
        .unwrap();

    let json = config.to_json();
    assert_eq!(json["create"]["pkgmgr"], "zypp");
    assert_eq!(
        json["create"]["tmpdir"],
        serde_json::Value::String(site.path("tmp").display().to_string())
    );
    assert_eq!(
        json["bootstraps"]["test"]["base"],
        serde_json::Value::String(format!(
            "name:base,baseurl:file://{},",
            site.path("repos/base").display()
        ))
    );
}
