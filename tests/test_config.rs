use rawhttp::config::{CONFIG_ENV, Config};

#[test]
fn test_config_defaults() {
    let cfg = Config::default();
    assert_eq!(cfg.server.listen_addr, "127.0.0.1:8080");
    assert_eq!(cfg.server.max_header_size, 8192);
    assert_eq!(cfg.server.read_chunk_size, 16 * 1024);
    assert_eq!(cfg.handler.default_body, "Hello, World!\n");
}

#[test]
fn test_config_from_yaml_partial() {
    let cfg = Config::from_yaml("server:\n  max_header_size: 1024\n").unwrap();
    assert_eq!(cfg.server.max_header_size, 1024);
    // Unspecified keys keep their defaults
    assert_eq!(cfg.server.listen_addr, "127.0.0.1:8080");
    assert_eq!(cfg.handler.default_body, "Hello, World!\n");
}

#[test]
fn test_config_from_yaml_full() {
    let yaml = r#"
server:
  listen_addr: "0.0.0.0:3000"
  max_header_size: 4096
  read_chunk_size: 512
handler:
  default_body: "nothing here"
"#;
    let cfg = Config::from_yaml(yaml).unwrap();
    assert_eq!(cfg.server.listen_addr, "0.0.0.0:3000");
    assert_eq!(cfg.server.max_header_size, 4096);
    assert_eq!(cfg.server.read_chunk_size, 512);
    assert_eq!(cfg.handler.default_body, "nothing here");
}

#[test]
fn test_config_rejects_zero_limits() {
    assert!(Config::from_yaml("server:\n  max_header_size: 0\n").is_err());
    assert!(Config::from_yaml("server:\n  read_chunk_size: 0\n").is_err());
}

#[test]
fn test_config_rejects_invalid_yaml() {
    assert!(Config::from_yaml("server: [not, a, map]").is_err());
}

#[test]
fn test_config_missing_file() {
    assert!(Config::from_file("/definitely/not/here.yaml").is_err());
}

// Environment variables are process-wide, so everything touching them lives
// in a single test.
#[test]
fn test_config_environment() {
    let path = std::env::temp_dir().join(format!("rawhttp-test-{}.yaml", std::process::id()));
    std::fs::write(&path, "server:\n  listen_addr: \"127.0.0.1:9000\"\n").unwrap();

    unsafe {
        std::env::set_var(CONFIG_ENV, &path);
        std::env::remove_var("LISTEN");
    }
    let cfg = Config::load().unwrap();
    assert_eq!(cfg.server.listen_addr, "127.0.0.1:9000");

    // LISTEN overrides the file
    unsafe {
        std::env::set_var("LISTEN", "0.0.0.0:5000");
    }
    let cfg = Config::load().unwrap();
    assert_eq!(cfg.server.listen_addr, "0.0.0.0:5000");

    unsafe {
        std::env::remove_var("LISTEN");
        std::env::remove_var(CONFIG_ENV);
    }
    std::fs::remove_file(&path).unwrap();
}
