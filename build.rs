use vergen::*;

fn main() {
    // Outside a git checkout there is no revision to stamp the
    // rate tables with: carry on, the headers are written without it.
    let flags = ConstantsFlags::SHA_SHORT | ConstantsFlags::REBUILD_ON_HEAD_CHANGE;
    if let Err(e) = gen(flags) {
        println!("cargo:warning=unable to determine git revision ({}), rate tables will not be stamped", e);
    }
}
