//! CLI tests that invoke the compiled `mkimg` binary

use assert_cmd::Command;
use mkimg_test_utils::TestSite;
use predicates::prelude::*;

/// Get a Command for the mkimg binary with no site config from the environment
fn mkimg_cmd() -> Command {
    let mut cmd = Command::cargo_bin("mkimg").expect("Failed to find mkimg binary");
    cmd.env_remove("MKIMG_SITECONF");
    cmd
}

#[test]
fn test_no_command_shows_hint() {
    mkimg_cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("mkimg --help"));
}

#[test]
fn test_show_json_reflects_siteconf() {
    let site = TestSite::new();
    let conf = site.write_siteconf("[common]\ndistro_name = Tizen\n\n[create]\ntmpdir = /srv/tmp\n");

    let output = mkimg_cmd()
        .args(["show", "--json", "--siteconf"])
        .arg(&conf)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["create"]["tmpdir"], "/srv/tmp");
    assert_eq!(json["chroot"]["distro_name"], "Tizen");
    assert_eq!(json["create"]["arch"], serde_json::Value::Null);
}

#[test]
fn test_siteconf_from_environment() {
    let site = TestSite::new();
    let conf = site.write_siteconf("[create]\ncachedir = /env/cache\n");

    mkimg_cmd()
        .env("MKIMG_SITECONF", &conf)
        .args(["show", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/env/cache"));
}

#[test]
fn test_arch_override() {
    let site = TestSite::new();
    let conf = site.write_siteconf("[create]\narch = i686\n");

    mkimg_cmd()
        .args(["show", "--json", "--arch", "x86_64", "--siteconf"])
        .arg(&conf)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"arch\": \"x86_64\""));
}

#[test]
fn test_set_overrides_siteconf() {
    let site = TestSite::new();
    let conf = site.write_siteconf("[create]\ntmpdir = /from/file\n");

    let output = mkimg_cmd()
        .args(["show", "--json", "--set", "create.tmpdir=/from/cli", "--set", "chroot.logfile=/l"])
        .arg("--siteconf")
        .arg(&conf)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["create"]["tmpdir"], "/from/cli");
    assert_eq!(json["chroot"]["logfile"], "/l");
}

#[test]
fn test_set_unknown_section_fails() {
    mkimg_cmd()
        .args(["show", "--set", "bogus.tmpdir=/x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config section: bogus"));
}

#[test]
fn test_missing_siteconf_fails() {
    let site = TestSite::new();

    mkimg_cmd()
        .args(["show", "--siteconf"])
        .arg(site.path("absent.conf"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"))
        .stderr(predicate::str::contains("Failed to find config file"));
}

#[test]
fn test_malformed_siteconf_fails() {
    let site = TestSite::new();
    let conf = site.write_siteconf("orphan = value\n");

    mkimg_cmd()
        .args(["show", "--siteconf"])
        .arg(&conf)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config file"));
}

#[test]
fn test_bootstraps_lists_repostrs() {
    let site = TestSite::new();
    let conf = site.write_siteconf(
        "[bootstrap1]\nrepoa_baseurl = http://x\nrepoa_priority = 1\n",
    );

    mkimg_cmd()
        .args(["bootstraps", "--siteconf"])
        .arg(&conf)
        .assert()
        .success()
        .stdout(predicate::str::contains("bootstrap1"))
        .stdout(predicate::str::contains("name:repoa,baseurl:http://x,priority:1,"));
}

#[test]
fn test_missing_kickstart_fails() {
    let site = TestSite::new();
    let conf = site.write_siteconf("[create]\narch = x86_64\n");

    mkimg_cmd()
        .args(["show", "--siteconf"])
        .arg(&conf)
        .arg("--ks")
        .arg(site.path("absent.ks"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot find ks file"));
}

#[test]
fn test_kickstart_without_repos_fails() {
    let site = TestSite::new();
    let conf = site.write_siteconf("[create]\narch = x86_64\n");
    let ks = site.write_kickstart("empty.ks", "part / --fstype=ext4\n");

    mkimg_cmd()
        .args(["show", "--siteconf"])
        .arg(&conf)
        .arg("--ks")
        .arg(&ks)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no valid repos found"));
}

#[test]
fn test_probe_reports_status() {
    mkimg_cmd()
        .arg("probe")
        .assert()
        .success()
        .stdout(predicate::str::contains("SELinux:"));
}

#[test]
fn test_kickstart_against_local_repository() {
    let site = TestSite::new();
    site.write_rpm_repo(
        "repo",
        &["bash-5.2-1.x86_64.rpm", "rpm-4.19.1-1.x86_64.rpm"],
    );
    let conf = site.write_siteconf(&format!(
        "[create]\ncachedir = {}\n",
        site.path("cache").display()
    ));
    let ks = site.write_kickstart(
        "handset.ks",
        &format!(
            "part / --fstype=ext4\nrepo --name=base --baseurl=file://{}\n",
            site.path("repo").display()
        ),
    );

    mkimg_cmd()
        .args(["show", "--json", "--siteconf"])
        .arg(&conf)
        .arg("--ks")
        .arg(&ks)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"handset\""))
        .stdout(predicate::str::contains("\"rpmver\": \"4.19.1\""))
        .stdout(predicate::str::contains("\"arch\": \"x86_64\""));
}
