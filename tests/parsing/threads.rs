use std::thread;

use technique::parsing;

use super::files_in;

#[test]
fn parsing_in_parallel() {
    let sources: Vec<String> = files_in("tests/samples/")
        .iter()
        .chain(files_in("tests/broken/").iter())
        .map(|file| {
            parsing::load(file)
                .unwrap_or_else(|e| panic!("Failed to load file {:?}: {:?}", file, e))
        })
        .collect();

    let sequential: Vec<_> = sources
        .iter()
        .map(|content| parsing::parse_with_recovery(content))
        .collect();

    // each source parsed on several threads at once, sharing nothing but
    // the borrowed text
    let sources = &sources;
    thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(move || {
                    sources
                        .iter()
                        .map(|content| parsing::parse_with_recovery(content))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        for handle in handles {
            let parallel = handle
                .join()
                .expect("parser thread panicked");
            assert_eq!(parallel, sequential);
        }
    });
}
