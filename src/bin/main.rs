fn main() {
  blockview::main();
}
