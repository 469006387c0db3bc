//! Integration tests for the configuration object through the public API.
//!
//! These exercise the registries, interceptors and configuration together the
//! way a shell session would: build a configuration, load the builtin layers,
//! change settings and read them back.

use std::rc::Rc;

use pktconf_core::domain::layer::builtin::{ETHER, IP, TCP, UDP};
use pktconf_core::{
    crypto_validator, register_builtin_commands, register_builtin_layers, run_command, AnsiTheme,
    ColorTheme, Conf, ConfBuilder, DependencyError, Field, GroupKey, LevelFilterSink, MaybeField,
    PromptSlot, RegistryError, RegistryKey, RegistryValue, SettingValue,
};
use tracing::level_filters::LevelFilter;

fn wired_conf() -> (Conf, Rc<LevelFilterSink>, Rc<PromptSlot>) {
    let log_sink = Rc::new(LevelFilterSink::new(LevelFilter::OFF));
    let prompt_sink = Rc::new(PromptSlot::default());
    let conf = ConfBuilder::new()
        .log_sink(log_sink.clone())
        .prompt_sink(prompt_sink.clone())
        .build()
        .expect("default level is accepted");
    (conf, log_sink, prompt_sink)
}

#[test]
fn test_build_applies_warning_threshold() {
    let (conf, log_sink, _) = wired_conf();

    assert_eq!(log_sink.current(), LevelFilter::WARN);
    assert_eq!(conf.log_level(), SettingValue::Int(30));
}

#[test]
fn test_log_level_writes_reach_the_sink() {
    let (conf, log_sink, _) = wired_conf();

    conf.set("logLevel", SettingValue::Int(10)).unwrap();
    assert_eq!(log_sink.current(), LevelFilter::DEBUG);
    assert_eq!(conf.log_level(), SettingValue::Int(10));

    conf.set("logLevel", "ERROR".into()).unwrap();
    assert_eq!(log_sink.current(), LevelFilter::ERROR);
    assert_eq!(conf.log_level(), SettingValue::from("ERROR"));
}

#[test]
fn test_prompt_and_theme_writes_re_render_the_prompt() {
    // Arrange
    let (conf, _, prompt_sink) = wired_conf();
    let theme: Rc<dyn ColorTheme> = Rc::new(AnsiTheme::new("green", "32"));

    // Act
    conf.set("prompt", "pkt> ".into()).unwrap();
    let plain = prompt_sink.current();
    conf.set("color_theme", SettingValue::Theme(theme)).unwrap();

    // Assert
    assert_eq!(plain.as_deref(), Some("pkt> "));
    assert_eq!(prompt_sink.current().as_deref(), Some("\x1b[32mpkt> \x1b[0m"));
    assert_eq!(conf.prompt().unwrap(), "pkt> ");
    assert_eq!(conf.color_theme().unwrap().name(), "green");
}

#[test]
fn test_numeric_registry_worked_example() {
    // Arrange
    let conf = Conf::new();
    let l3 = conf.l3types().unwrap();

    // Act
    l3.borrow_mut().register(6, TCP);
    l3.borrow_mut().register(17, UDP);

    // Assert
    let l3 = l3.borrow();
    assert_eq!(l3.lookup(6_u32), Ok(RegistryValue::Type(TCP)));
    assert_eq!(l3.lookup(TCP), Ok(RegistryValue::Code(6)));
    assert!(l3.contains(UDP));
    assert_eq!(l3.get(99_u32, RegistryValue::Code(0)), RegistryValue::Code(0));
    assert_eq!(
        l3.lookup(99_u32),
        Err(RegistryError::KeyNotFound(RegistryKey::ByCode(99)))
    );
}

#[test]
fn test_reregistering_a_code_leaves_the_old_reverse_mapping() {
    let conf = Conf::new();
    let l2 = conf.l2types().unwrap();

    l2.borrow_mut().register(1, ETHER);
    l2.borrow_mut().register(1, IP);

    let l2 = l2.borrow();
    assert_eq!(l2.lookup(1_u32), Ok(RegistryValue::Type(IP)));
    assert_eq!(l2.lookup(ETHER), Ok(RegistryValue::Code(1)));
}

#[test]
fn test_field_groups_track_owner_layers() {
    // Arrange
    let conf = Conf::new();
    let sport = Field::new("sport", [TCP, UDP]);
    let dst = Field::new("dst", [IP]);
    let resolve = conf.resolve().unwrap();

    // Act
    resolve.borrow_mut().add([&sport as &dyn MaybeField, &dst, &"not a field"]);
    resolve.borrow_mut().remove([&sport as &dyn MaybeField]);

    // Assert
    let resolve = resolve.borrow();
    assert_eq!(resolve.len(), 1);
    assert!(resolve.contains(GroupKey::Layer(&IP)));
    assert!(!resolve.contains(GroupKey::Layer(&TCP)));
    assert!(resolve.contains(GroupKey::Field(&dst)));
    assert!(conf.noenum().unwrap().borrow().is_empty());
}

#[test]
fn test_configure_then_read_falls_back_for_untouched_names() {
    // Arrange
    let source = Conf::new();
    source.set("iface", "eth0".into()).unwrap();
    source.set("verb", SettingValue::Int(0)).unwrap();
    let target = source.sibling();
    target.set("promisc", SettingValue::Int(0)).unwrap();

    // Act
    target.configure(&source);

    // Assert
    assert_eq!(target.iface().unwrap().as_deref(), Some("eth0"));
    assert_eq!(target.verb().unwrap(), 0);
    assert_eq!(target.get("promisc").unwrap(), SettingValue::Int(1));
}

#[test]
fn test_crypto_gate_follows_the_setting() {
    let conf = Conf::new();
    let sign = crypto_validator(|_: &Conf, payload: Vec<u8>| payload.len());

    assert_eq!(sign(&conf, vec![1, 2, 3]), Err(DependencyError::CryptoUnavailable));

    conf.set("crypto_valid", SettingValue::Bool(true)).unwrap();
    assert_eq!(sign(&conf, vec![1, 2, 3]), Ok(3));
}

#[test]
fn test_shell_session_with_builtins() {
    // Arrange
    let conf = Conf::new();
    register_builtin_commands(&conf).unwrap();
    register_builtin_layers(&conf).unwrap();
    let mut out = Vec::new();

    // Act
    run_command(&conf, "set", &["iface".into(), "'wlan0'".into()], &mut out).unwrap();
    run_command(&conf, "get", &["iface".into()], &mut out).unwrap();
    run_command(&conf, "layers", &[], &mut out).unwrap();

    // Assert
    let text = String::from_utf8(out).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("iface = 'wlan0'"));
    assert_eq!(lines.next(), Some("'wlan0'"));
    assert_eq!(lines.next(), Some(format!("{:<20}: Ethernet", "Ether").as_str()));
    assert_eq!(text.lines().count(), 2 + 8);
}

#[test]
fn test_dump_shows_every_declared_setting_once() {
    let conf = Conf::new();
    register_builtin_layers(&conf).unwrap();

    let dump = conf.dump();

    for name in ["version", "checkIPaddr", "l3types", "prog", "services_udp", "logLevel", "color_theme"] {
        let count = dump
            .lines()
            .filter(|line| line.split_whitespace().next() == Some(name))
            .count();
        assert_eq!(count, 1, "{name}");
    }
    assert!(dump.contains("<NumericTypeRegistry"));
}
