fn main() {
    edit_script::main();
}
