use quote::{format_ident, quote};

/// Generates one `#[test]` per `.fl` file below `bin/tests`, each checked with `flow_expect`.
#[proc_macro]
pub fn generate_tests(_: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let root_dir = format!("{}/..", env!("CARGO_MANIFEST_DIR"));
    let mut files: Vec<_> = walkdir::WalkDir::new(root_dir.clone())
        .into_iter()
        .flatten()
        .filter(|entry| entry.path().extension() == Some("fl".as_ref()))
        .map(|entry| entry.into_path())
        .collect();
    files.sort();

    let tests = files.iter().map(|path| {
        let test_file_path = path.to_string_lossy();
        let relative_test_path = path.strip_prefix(&root_dir).unwrap().to_string_lossy();
        let test_ident = format_ident!(
            "test_{}",
            relative_test_path.replace('/', "_").replace(".fl", "")
        );
        quote! {
            #[test]
            fn #test_ident() {
                flow_expect(std::fs::read_to_string(#test_file_path).unwrap().as_str());
            }
        }
    });

    quote! {
        #[ctor::ctor]
        fn init() {
            env_logger::init();
        }

        #(#tests)*
    }
    .into()
}
