use ndbackend::{ErrorKind, Range};

#[test]
fn range_with_step()
{
    let r = Range::new(0, 10, 2).unwrap();
    assert_eq!(r.size(), 5);
    assert_eq!(r.to_vec(), vec![0, 2, 4, 6, 8]);
    assert_eq!(r.get(&[3]).unwrap(), 6);
    assert!(r.contains(8));
    assert!(!r.contains(9));
    assert!(!r.contains(10));
}

#[test]
fn range_is_immutable()
{
    let r = Range::new(0, 10, 2).unwrap();
    let err = r.set(&[0], 1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unsupported);
    assert!(r.sort().is_ok());
    assert_eq!(r.to_vec(), vec![0, 2, 4, 6, 8]);
    // views of a range stay immutable
    assert!(r.view().set(&[1], 0).is_err());
    assert!(r.copy().set(&[1], 0).is_ok());
}

#[test]
fn descending_range()
{
    let r = Range::new(5, 0, -2).unwrap();
    assert_eq!(r.to_vec(), vec![5, 3, 1]);
    assert!(r.contains(1));
    assert!(r.sort().is_err());
}

#[test]
fn invalid_ranges()
{
    assert!(Range::new(0, 10, 0).is_err());
    assert!(Range::new(0, 10, -1).is_err());
    assert_eq!(Range::exclusive(3, 3).unwrap().size(), 0);
}
