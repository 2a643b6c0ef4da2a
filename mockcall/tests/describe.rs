// vim: tw=80
//! Deriving `Describe` for user types

use mockcall::*;

#[derive(Clone, Debug, Describe)]
struct Unit;

#[derive(Clone, Debug, Describe)]
#[describe(methods(read, close))]
struct File {
    _fd: i32
}

#[derive(Clone, Debug, Describe)]
#[describe(name = "net.Conn", methods(read, write, close))]
enum Conn {
    Tcp,
    _Udp
}

fn reader() -> TypeDesc {
    TypeDesc::interface("io.Reader", &["read"])
}

fn read_writer() -> TypeDesc {
    TypeDesc::interface("io.ReadWriter", &["read", "write"])
}

#[test]
fn unit() {
    assert_eq!(TypeDesc::named("Unit", &[]), Unit::describe());
    assert_eq!("Unit", Unit::describe().to_string());
}

#[test]
fn methods() {
    assert_eq!(&["read", "close"], File::describe().method_set());
    assert!(is_assignable(&File::describe(), &reader()));
    assert!(!is_assignable(&File::describe(), &read_writer()));
    assert!(!is_assignable(&Unit::describe(), &reader()));
}

#[test]
fn renamed() {
    assert_eq!("net.Conn", Conn::describe().to_string());
    assert!(is_assignable(&read_writer(), &Conn::describe()));
}

#[test]
fn as_action_parameter() {
    let c = Call::new("MockServer", "serve",
                      Signature::new()
                          .param_desc(read_writer())
                          .returns::<bool>());
    c.add_returning_action(|conn: Conn| matches!(conn, Conn::Tcp));
    let r = c.run_actions(vec![Box::new(Conn::Tcp)]);
    assert_eq!(Some(&true), r[0].downcast_ref::<bool>().ok());
}

#[test]
fn in_containers() {
    assert_eq!(TypeDesc::sequence(File::describe()),
               <Vec<File>>::describe());
    assert!(!is_assignable(&<Vec<File>>::describe(),
                           &<Vec<AnyArg>>::describe()));
}
