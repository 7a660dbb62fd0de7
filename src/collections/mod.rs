pub mod single_linked_list;
