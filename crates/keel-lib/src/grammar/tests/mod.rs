mod expressions;
mod helpers;
mod items;
mod recovery;
