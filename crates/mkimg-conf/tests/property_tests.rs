use mkimg_conf::bootstrap::decode_section;
use mkimg_conf::{RepoRef, SiteConf};
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_bootstrap_fields_keep_declaration_order(
        fields in prop::collection::vec(("[a-z]{1,8}", "[a-zA-Z0-9/.]{0,12}"), 1..8)
    ) {
        let options: Vec<(String, String)> = fields
            .iter()
            .map(|(attr, value)| (format!("repoa_{}", attr), value.clone()))
            .collect();

        let (name, group) = decode_section("bootstrap1", &options);
        prop_assert_eq!(name, "bootstrap1");
        prop_assert_eq!(group.repos().len(), 1);

        let expected: String = fields
            .iter()
            .map(|(attr, value)| format!("{}:{},", attr, value))
            .collect();
        prop_assert_eq!(group.repo("repoa").unwrap().encoded(), expected);
    }

    #[test]
    fn test_name_option_never_becomes_a_field(
        group_name in "[a-z]{1,10}",
        url in "http://[a-z]{1,10}/[a-z]{0,10}"
    ) {
        let options = vec![
            ("name".to_string(), group_name.clone()),
            ("main".to_string(), url.clone()),
        ];
        let (name, group) = decode_section("bootstrap_x", &options);
        prop_assert_eq!(&name, &group_name);
        prop_assert_eq!(
            group.repo("main").unwrap().encoded(),
            format!("name:main,baseurl:{},", url)
        );
    }

    #[test]
    fn test_repostr_parse_inverts_render(
        name in "[a-z][a-z0-9]{0,8}",
        url in "(http|https|ftp|file)://[a-z]{1,10}(:[0-9]{2,4})?/[a-z/]{0,12}",
        priority in 1u32..100
    ) {
        let repo = RepoRef::new(name.clone())
            .with("baseurl", url.clone())
            .with("priority", priority.to_string());
        let parsed = RepoRef::parse(&repo.to_repostr()).unwrap();
        prop_assert_eq!(parsed.name(), Some(name.as_str()));
        prop_assert_eq!(parsed.baseurl(), Some(url.as_str()));
        prop_assert_eq!(parsed, repo);
    }

    #[test]
    fn test_siteconf_parse_is_deterministic(
        values in prop::collection::vec("[a-zA-Z0-9/._-]{1,16}", 1..6)
    ) {
        let mut content = String::from("[create]\n");
        for (i, value) in values.iter().enumerate() {
            content.push_str(&format!("opt{} = {}\n", i, value));
        }
        let first = SiteConf::parse("mkimg.conf", &content).unwrap();
        let second = SiteConf::parse("mkimg.conf", &content).unwrap();
        prop_assert_eq!(first, second);
    }
}
